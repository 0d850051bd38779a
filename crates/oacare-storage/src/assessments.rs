use jiff::Timestamp;
use oacare_core::ids::CodeKind;
use oacare_core::keys;
use oacare_core::models::assessment::{Assessment, Indicators};
use oacare_core::page::{Page, PageRequest};
use oacare_scoring::reporting::newer_first;
use oacare_scoring::screening;
use tracing::info;

use crate::error::StorageError;
use crate::sequence;
use crate::state::{load_all, load_optional, save_state};
use crate::store::ObjectStore;

const KIND: &str = "assessment";

#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub elderly_id: String,
    pub user_id: Option<String>,
    pub indicators: Indicators,
    pub assessed_at: Timestamp,
}

/// Score and persist a screening. The stored `yes_count` and `result_text`
/// are computed here and never recomputed.
pub async fn create(store: &dyn ObjectStore, new: NewAssessment) -> Result<Assessment, StorageError> {
    let scored = screening::score(&new.indicators);
    let id = sequence::next_code(store, CodeKind::Assessment).await?;

    let assessment = Assessment {
        id,
        elderly_id: new.elderly_id,
        user_id: new.user_id,
        assessed_at: new.assessed_at,
        indicators: new.indicators,
        yes_count: scored.yes_count,
        result_text: scored.result_text.to_string(),
    };
    save_state(store, &keys::assessment(&assessment.id), &assessment).await?;

    info!(
        assessment_id = %assessment.id,
        elderly_id = %assessment.elderly_id,
        yes_count = assessment.yes_count,
        "assessment recorded"
    );
    Ok(assessment)
}

pub async fn get(store: &dyn ObjectStore, id: &str) -> Result<Assessment, StorageError> {
    load_optional(store, &keys::assessment(id))
        .await?
        .ok_or_else(|| StorageError::record_not_found(KIND, id))
}

/// Every assessment, newest first. Same-instant assessments order by the
/// numeric part of the id, highest first.
pub async fn all(store: &dyn ObjectStore) -> Result<Vec<Assessment>, StorageError> {
    let mut assessments: Vec<Assessment> = load_all(store, keys::ASSESSMENTS_PREFIX).await?;
    assessments.sort_by(newer_first);
    Ok(assessments)
}

/// One person's assessments, newest first.
pub async fn history(store: &dyn ObjectStore, elderly_id: &str) -> Result<Vec<Assessment>, StorageError> {
    let mut assessments = all(store).await?;
    assessments.retain(|a| a.elderly_id == elderly_id);
    Ok(assessments)
}

pub async fn list(
    store: &dyn ObjectStore,
    elderly_id: Option<&str>,
    page: PageRequest,
) -> Result<Page<Assessment>, StorageError> {
    let assessments = match elderly_id {
        Some(id) => history(store, id).await?,
        None => all(store).await?,
    };
    Ok(page.paginate(assessments))
}

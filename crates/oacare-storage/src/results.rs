use jiff::Timestamp;
use oacare_core::keys;
use oacare_core::models::assessment_result::AssessmentResult;
use tracing::info;
use uuid::Uuid;

use crate::assessments;
use crate::error::StorageError;
use crate::state::{load_all, save_state};
use crate::store::ObjectStore;

#[derive(Debug, Clone)]
pub struct NewResult {
    pub assessment_id: String,
    pub elderly_id: String,
    pub score: u8,
    pub results: String,
}

/// Attach a result to an existing assessment of the same person.
pub async fn create(store: &dyn ObjectStore, new: NewResult) -> Result<AssessmentResult, StorageError> {
    let assessment = assessments::get(store, &new.assessment_id).await?;
    if assessment.elderly_id != new.elderly_id {
        return Err(StorageError::Conflict(format!(
            "assessment {} belongs to {}, not {}",
            assessment.id, assessment.elderly_id, new.elderly_id
        )));
    }

    let result = AssessmentResult {
        id: Uuid::new_v4(),
        assessment_id: new.assessment_id,
        elderly_id: new.elderly_id,
        score: new.score,
        results: new.results,
        created_at: Timestamp::now(),
    };
    save_state(store, &keys::assessment_result(&result.assessment_id, result.id), &result).await?;

    info!(result_id = %result.id, assessment_id = %result.assessment_id, "assessment result recorded");
    Ok(result)
}

/// Results for one assessment, oldest first.
pub async fn for_assessment(
    store: &dyn ObjectStore,
    assessment_id: &str,
) -> Result<Vec<AssessmentResult>, StorageError> {
    let mut results: Vec<AssessmentResult> =
        load_all(store, &keys::assessment_results_prefix(assessment_id)).await?;
    results.sort_by_key(|r| r.created_at);
    Ok(results)
}

pub async fn latest_for(
    store: &dyn ObjectStore,
    assessment_id: &str,
) -> Result<Option<AssessmentResult>, StorageError> {
    Ok(for_assessment(store, assessment_id).await?.pop())
}

/// A result by its own id, wherever it is filed.
pub async fn get(store: &dyn ObjectStore, id: Uuid) -> Result<AssessmentResult, StorageError> {
    let results: Vec<AssessmentResult> = load_all(store, keys::ASSESSMENT_RESULTS_PREFIX).await?;
    results
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| StorageError::record_not_found("assessment result", id.to_string()))
}

use jiff::Timestamp;
use oacare_core::ids::{CodeKind, compare_codes};
use oacare_core::keys;
use oacare_core::models::analysis::AnalysisRecord;
use tracing::info;
use uuid::Uuid;

use crate::error::StorageError;
use crate::state::{load_all, save_state};
use crate::store::ObjectStore;
use crate::{elderly, results, sequence};

#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub executive_id: String,
    pub elderly_id: String,
    pub result_id: Option<Uuid>,
    pub findings: String,
}

/// Record an analysis for an active person. A referenced result must exist
/// and belong to the same person.
pub async fn create(store: &dyn ObjectStore, new: NewAnalysis) -> Result<AnalysisRecord, StorageError> {
    elderly::get(store, &new.elderly_id).await?;
    if let Some(result_id) = new.result_id {
        let result = results::get(store, result_id).await?;
        if result.elderly_id != new.elderly_id {
            return Err(StorageError::Conflict(format!(
                "result {result_id} belongs to {}, not {}",
                result.elderly_id, new.elderly_id
            )));
        }
    }

    let id = sequence::next_code(store, CodeKind::Analysis).await?;
    let record = AnalysisRecord {
        id,
        executive_id: new.executive_id,
        result_id: new.result_id,
        elderly_id: new.elderly_id,
        findings: new.findings,
        created_at: Timestamp::now(),
    };
    save_state(store, &keys::analysis(&record.id), &record).await?;

    info!(record_id = %record.id, elderly_id = %record.elderly_id, "analysis recorded");
    Ok(record)
}

/// Every analysis record, highest record number first.
pub async fn list(store: &dyn ObjectStore) -> Result<Vec<AnalysisRecord>, StorageError> {
    let mut records: Vec<AnalysisRecord> = load_all(store, keys::ANALYSIS_PREFIX).await?;
    records.sort_by(|a, b| compare_codes(&b.id, &a.id));
    Ok(records)
}

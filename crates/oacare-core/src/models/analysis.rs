use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

pub const MAX_FINDINGS_CHARS: usize = 2000;

/// An executive's written analysis of one person, optionally tied to the
/// assessment result it was based on.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnalysisRecord {
    #[serde(rename = "recordID")]
    pub id: String,
    /// User id of the executive or admin who wrote it.
    #[serde(rename = "executiveID")]
    pub executive_id: String,
    #[serde(rename = "as_resultsID")]
    pub result_id: Option<Uuid>,
    #[serde(rename = "elderlyID")]
    pub elderly_id: String,
    #[serde(rename = "an_results")]
    pub findings: String,
    pub created_at: jiff::Timestamp,
}

impl AnalysisRecord {
    /// Case-insensitive substring match over record id, elderly id and
    /// findings.
    pub fn matches(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        needle.is_empty()
            || [&self.id, &self.elderly_id, &self.findings]
                .into_iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct AnalysisInput {
    #[serde(default, rename = "elderlyID")]
    pub elderly_id: Option<String>,
    #[serde(default, rename = "as_resultsID")]
    pub result_id: Option<Uuid>,
    #[serde(default, rename = "an_results")]
    pub findings: String,
}

/// Trim and cap the findings text; empty is rejected.
pub fn normalize_findings(raw: &str) -> Result<String, CoreError> {
    let text: String = raw.trim().chars().take(MAX_FINDINGS_CHARS).collect();
    if text.is_empty() {
        Err(CoreError::MissingField("an_results".to_string()))
    } else {
        Ok(text)
    }
}

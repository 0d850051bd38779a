use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

pub const MAX_RESULT_CHARS: usize = 255;
pub const MAX_SCORE: u8 = 5;

/// The reported outcome attached to an assessment. Kept apart from the raw
/// answers so the wording can change without touching the assessment.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssessmentResult {
    #[serde(rename = "as_resultsID")]
    pub id: Uuid,
    #[serde(rename = "assessmentID")]
    pub assessment_id: String,
    #[serde(rename = "elderlyID")]
    pub elderly_id: String,
    #[serde(rename = "as_score")]
    pub score: u8,
    #[serde(rename = "as_results")]
    pub results: String,
    pub created_at: jiff::Timestamp,
}

/// Parse a score given as a JSON number or numeric string, truncating
/// fractions. Must land in `0..=5`.
pub fn parse_score(value: &serde_json::Value) -> Result<u8, CoreError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };

    parsed
        .filter(|n| (0..=i64::from(MAX_SCORE)).contains(n))
        .map(|n| n as u8)
        .ok_or_else(|| CoreError::InvalidField {
            field: "as_score".to_string(),
            reason: "must be an integer 0-5".to_string(),
        })
}

/// Trim and cap free-text results at 255 characters; empty is rejected.
pub fn normalize_result_text(raw: &str) -> Result<String, CoreError> {
    let text: String = raw.trim().chars().take(MAX_RESULT_CHARS).collect();
    if text.is_empty() {
        Err(CoreError::MissingField("as_results".to_string()))
    } else {
        Ok(text)
    }
}

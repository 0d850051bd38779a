use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// A health-education article shown to members.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HealthInfo {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct HealthInfoInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl HealthInfoInput {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::MissingField("title".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(CoreError::MissingField("content".to_string()));
        }
        Ok(())
    }
}

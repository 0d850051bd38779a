use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Admin,
    Executive,
    /// Field staff who register elderly and run screenings.
    #[serde(alias = "member")]
    User,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "admin" => Some(Role::Admin),
            "executive" => Some(Role::Executive),
            "user" | "member" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Executive => "executive",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored account. Never serialized to API clients; use [`UserSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userID")]
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserSummary {
    #[serde(rename = "userID")]
    pub id: String,
    pub username: String,
    pub role: Role,
    pub created_at: jiff::Timestamp,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Trim a username and check it is usable as an object key segment:
/// 3 to 64 characters of ASCII letters, digits, `.`, `_` or `-`.
pub fn normalize_username(raw: &str) -> Result<String, CoreError> {
    let username = raw.trim();
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    if !(3..=64).contains(&username.len()) || !username.chars().all(allowed) {
        return Err(CoreError::InvalidField {
            field: "username".to_string(),
            reason: "3-64 characters of letters, digits, '.', '_' or '-'".to_string(),
        });
    }
    Ok(username.to_string())
}

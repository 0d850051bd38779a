use std::fmt;

use oacare_core::models::user::Role;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    Delete,
    Register,
    Login,
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Elderly,
    Assessment,
    AssessmentResult,
    Analysis,
    User,
    HealthInfo,
    Session,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Register => "register",
            Action::Login => "login",
            Action::Logout => "logout",
        })
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Elderly => "elderly",
            Resource::Assessment => "assessment",
            Resource::AssessmentResult => "assessment_result",
            Resource::Analysis => "analysis",
            Resource::User => "user",
            Resource::HealthInfo => "health_info",
            Resource::Session => "session",
        })
    }
}

/// Who did what to which record.
///
/// Logged via `tracing` under the `audit` target so it can be filtered or
/// routed apart from ordinary request logs.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: Action,
    pub resource: Resource,
    pub resource_id: String,
    /// User id of the actor; `None` for anonymous calls such as login.
    pub actor: Option<String>,
    pub role: Option<Role>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: Action, resource: Resource, resource_id: impl Into<String>) -> Self {
        Self {
            action,
            resource,
            resource_id: resource_id.into(),
            actor: None,
            role: None,
            details: None,
        }
    }

    pub fn by(mut self, actor: impl Into<String>, role: Role) -> Self {
        self.actor = Some(actor.into());
        self.role = Some(role);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn emit(&self) {
        info!(
            target: "audit",
            {
            audit.action = %self.action,
            audit.resource = %self.resource,
            audit.resource_id = %self.resource_id,
            audit.actor = self.actor.as_deref().unwrap_or("anonymous"),
            audit.role = self.role.map(Role::as_str).unwrap_or("none"),
            audit.details = ?self.details,
            },
            "audit event"
        );
    }
}

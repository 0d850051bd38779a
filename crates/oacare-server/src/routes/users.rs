use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use oacare_audit::events::{Action, AuditEvent, Resource};
use oacare_core::ids::CodeKind;
use oacare_core::models::user::{Role, UserSummary, normalize_username};
use oacare_storage::users;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::routes::auth::{hash_blocking, parse_role};
use crate::routes::required;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    user.require_admin()?;
    let all = users::list(state.store()).await?;
    Ok(Json(all.iter().map(UserSummary::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<NewUserRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    user.require_admin()?;
    let username = normalize_username(required("username", req.username.as_deref())?)?;
    let password = required("password", req.password.as_deref())?.to_string();
    let role = parse_role(req.role.as_deref())?;

    let password_hash = hash_blocking(password).await?;
    let created = users::register(state.store(), &username, password_hash, role).await?;

    AuditEvent::new(Action::Create, Resource::User, &created.id)
        .by(&user.0.user_id, user.0.role)
        .emit();

    Ok((StatusCode::CREATED, Json(UserSummary::from(&created))))
}

/// Rename and/or change role. Omitted fields keep their value.
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<String>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    user.require_admin()?;
    let user_id = CodeKind::User.parse(&user_id)?;
    let existing = users::get(state.store(), &user_id).await?;

    let username = match req.username.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => normalize_username(raw)?,
        None => existing.username,
    };
    let role = match req.role.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Role::parse(raw)
            .ok_or_else(|| ApiError::BadRequest("role must be admin, executive or user".to_string()))?,
        None => existing.role,
    };

    let updated = users::update(state.store(), &user_id, &username, role).await?;

    AuditEvent::new(Action::Update, Resource::User, &user_id)
        .by(&user.0.user_id, user.0.role)
        .emit();

    Ok(Json(UserSummary::from(&updated)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    user.require_admin()?;
    let user_id = CodeKind::User.parse(&user_id)?;
    if user_id == user.0.user_id {
        return Err(ApiError::Conflict("cannot delete the signed-in account".to_string()));
    }
    users::delete(state.store(), &user_id).await?;

    AuditEvent::new(Action::Delete, Resource::User, &user_id)
        .by(&user.0.user_id, user.0.role)
        .emit();

    Ok(StatusCode::NO_CONTENT)
}

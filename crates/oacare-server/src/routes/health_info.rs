use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use oacare_audit::events::{Action, AuditEvent, Resource};
use oacare_core::models::health_info::{HealthInfo, HealthInfoInput};
use oacare_storage::health_info;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid health info id: {raw}")))
}

pub async fn list_health_info(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<HealthInfo>>, ApiError> {
    Ok(Json(health_info::list(state.store()).await?))
}

pub async fn get_health_info(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<HealthInfo>, ApiError> {
    Ok(Json(health_info::get(state.store(), parse_id(&id)?).await?))
}

pub async fn create_health_info(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(input): JsonBody<HealthInfoInput>,
) -> Result<(StatusCode, Json<HealthInfo>), ApiError> {
    user.require_admin()?;
    input.validate()?;
    let article = health_info::create(state.store(), input).await?;

    AuditEvent::new(Action::Create, Resource::HealthInfo, article.id.to_string())
        .by(&user.0.user_id, user.0.role)
        .emit();

    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update_health_info(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<HealthInfoInput>,
) -> Result<Json<HealthInfo>, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;
    input.validate()?;
    let article = health_info::update(state.store(), id, input).await?;

    AuditEvent::new(Action::Update, Resource::HealthInfo, id.to_string())
        .by(&user.0.user_id, user.0.role)
        .emit();

    Ok(Json(article))
}

pub async fn delete_health_info(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    user.require_admin()?;
    let id = parse_id(&id)?;
    health_info::delete(state.store(), id).await?;

    AuditEvent::new(Action::Delete, Resource::HealthInfo, id.to_string())
        .by(&user.0.user_id, user.0.role)
        .emit();

    Ok(StatusCode::NO_CONTENT)
}

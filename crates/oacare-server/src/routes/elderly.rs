use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use oacare_audit::events::{Action, AuditEvent, Resource};
use oacare_core::ids::CodeKind;
use oacare_core::models::elderly::{Elderly, ElderlyInput};
use oacare_core::page::Page;
use oacare_storage::elderly::{self, DeletePolicy};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::routes::page_request;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExistsQuery {
    #[serde(rename = "citizenID")]
    pub citizen_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
    #[serde(rename = "elderlyID", skip_serializing_if = "Option::is_none")]
    pub elderly_id: Option<String>,
    #[serde(rename = "citizenID", skip_serializing_if = "Option::is_none")]
    pub citizen_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub hard: Option<String>,
}

pub(crate) fn parse_elderly_id(raw: &str) -> Result<String, ApiError> {
    Ok(CodeKind::Elderly.parse(raw)?)
}

pub async fn list_elderly(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<Elderly>>, ApiError> {
    let page = page_request(q.page.as_deref(), q.page_size.as_deref());
    let keyword = q.search.as_deref().unwrap_or_default();
    Ok(Json(elderly::search(state.store(), keyword, page).await?))
}

pub async fn create_elderly(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    JsonBody(input): JsonBody<ElderlyInput>,
) -> Result<(StatusCode, Json<Elderly>), ApiError> {
    let profile = input.into_profile()?;
    let created = elderly::create(state.store(), Some(&principal.user_id), profile).await?;

    AuditEvent::new(Action::Create, Resource::Elderly, &created.id)
        .by(&principal.user_id, principal.role)
        .emit();

    Ok((StatusCode::CREATED, Json(created)))
}

/// Look a person up by citizen id (preferred) or exact name.
pub async fn elderly_exists(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<ExistsQuery>,
) -> Result<Json<ExistsResponse>, ApiError> {
    let citizen_id = q.citizen_id.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let name = q.name.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let found = match (citizen_id, name) {
        (Some(citizen_id), _) => elderly::find_by_citizen_id(state.store(), citizen_id).await?,
        (None, Some(name)) => elderly::find_by_name(state.store(), name).await?,
        (None, None) => return Err(ApiError::BadRequest("citizenID or name is required".to_string())),
    };

    Ok(Json(match found {
        Some(e) => ExistsResponse {
            exists: true,
            elderly_id: Some(e.id),
            citizen_id: e.profile.citizen_id,
            name: Some(e.profile.name),
        },
        None => ExistsResponse {
            exists: false,
            elderly_id: None,
            citizen_id: None,
            name: None,
        },
    }))
}

pub async fn get_elderly(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Elderly>, ApiError> {
    let id = parse_elderly_id(&id)?;
    Ok(Json(elderly::get(state.store(), &id).await?))
}

pub async fn update_elderly(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ElderlyInput>,
) -> Result<Json<Elderly>, ApiError> {
    let id = parse_elderly_id(&id)?;
    let profile = input.into_profile()?;
    let updated = elderly::update(state.store(), &id, profile).await?;

    AuditEvent::new(Action::Update, Resource::Elderly, &id)
        .by(&principal.user_id, principal.role)
        .emit();

    Ok(Json(updated))
}

/// Soft delete unless configured otherwise. `?hard=true` forces a hard
/// delete and is reserved for admins.
pub async fn delete_elderly(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Query(q): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    let id = parse_elderly_id(&id)?;
    let hard_requested = q
        .hard
        .as_deref()
        .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

    let policy = if hard_requested {
        user.require_admin()?;
        DeletePolicy::Hard
    } else {
        state.config.delete_policy
    };
    elderly::delete(state.store(), &id, policy).await?;

    AuditEvent::new(Action::Delete, Resource::Elderly, &id)
        .by(&user.0.user_id, user.0.role)
        .with_details(serde_json::json!({ "policy": policy }))
        .emit();

    Ok(StatusCode::NO_CONTENT)
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oacare_audit::events::{Action, AuditEvent, Resource};
use oacare_core::ids::CodeKind;
use oacare_core::models::assessment_result::{normalize_result_text, parse_score};
use oacare_storage::results::{self, NewResult};
use oacare_storage::{assessments, elderly};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::routes::elderly::parse_elderly_id;
use crate::routes::required;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResultRequest {
    #[serde(rename = "assessmentID", default)]
    pub assessment_id: Option<String>,
    #[serde(rename = "elderlyID", default)]
    pub elderly_id: Option<String>,
    #[serde(default)]
    pub as_score: Option<serde_json::Value>,
    #[serde(default)]
    pub as_results: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultCreated {
    pub success: bool,
    #[serde(rename = "as_resultsID")]
    pub id: Uuid,
    #[serde(rename = "assessmentID")]
    pub assessment_id: String,
}

/// What the result page shows for one assessment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    #[serde(rename = "assessmentID")]
    pub assessment_id: String,
    #[serde(rename = "elderlyID")]
    pub elderly_id: String,
    pub elderly_name: Option<String>,
    pub yes_count: u8,
    pub result_text: String,
    /// Newest recorded `as_score`, or the write-time yes count when no
    /// result has been recorded.
    pub score: u8,
}

pub async fn create_result(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    JsonBody(req): JsonBody<ResultRequest>,
) -> Result<(StatusCode, Json<ResultCreated>), ApiError> {
    let assessment_id = CodeKind::Assessment.parse(required("assessmentID", req.assessment_id.as_deref())?)?;
    let elderly_id = parse_elderly_id(required("elderlyID", req.elderly_id.as_deref())?)?;
    let score = match &req.as_score {
        None | Some(serde_json::Value::Null) => return Err(ApiError::BadRequest("as_score is required".to_string())),
        Some(value) => parse_score(value)?,
    };
    let results = normalize_result_text(req.as_results.as_deref().unwrap_or_default())?;

    let result = results::create(
        state.store(),
        NewResult {
            assessment_id,
            elderly_id,
            score,
            results,
        },
    )
    .await?;

    AuditEvent::new(Action::Create, Resource::AssessmentResult, result.id.to_string())
        .by(&principal.user_id, principal.role)
        .emit();

    Ok((
        StatusCode::CREATED,
        Json(ResultCreated {
            success: true,
            id: result.id,
            assessment_id: result.assessment_id,
        }),
    ))
}

pub async fn get_result(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ResultView>, ApiError> {
    let id = CodeKind::Assessment.parse(&id)?;
    let assessment = assessments::get(state.store(), &id).await?;
    let latest = results::latest_for(state.store(), &id).await?;
    let elderly_name = match elderly::get(state.store(), &assessment.elderly_id).await {
        Ok(e) => Some(e.profile.name),
        Err(oacare_storage::error::StorageError::RecordNotFound { .. }) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ResultView {
        score: latest.map_or(assessment.yes_count, |r| r.score),
        assessment_id: assessment.id,
        elderly_id: assessment.elderly_id,
        elderly_name,
        yes_count: assessment.yes_count,
        result_text: assessment.result_text,
    }))
}

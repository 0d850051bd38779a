use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use oacare_audit::events::{Action, AuditEvent, Resource};
use oacare_core::models::assessment::Assessment;
use oacare_core::page::Page;
use oacare_scoring::screening::Answers;
use oacare_storage::assessments::{self, NewAssessment};
use oacare_storage::elderly;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::routes::elderly::parse_elderly_id;
use crate::routes::{page_request, required};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    #[serde(rename = "elderlyID", default)]
    pub elderly_id: Option<String>,
    #[serde(flatten)]
    pub answers: Answers,
    #[serde(default)]
    pub assessment_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentCreated {
    pub ok: bool,
    #[serde(rename = "assessmentID")]
    pub assessment_id: String,
    pub yes_count: u8,
    pub result_text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(rename = "elderlyID")]
    pub elderly_id: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRow {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub elderly_name: Option<String>,
}

/// An RFC 3339 timestamp, or a bare date taken as midnight UTC.
fn parse_assessment_date(raw: &str) -> Result<Timestamp, ApiError> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(ts);
    }
    raw.parse::<Date>()
        .ok()
        .and_then(|d| d.to_zoned(TimeZone::UTC).ok())
        .map(|z| z.timestamp())
        .ok_or_else(|| ApiError::BadRequest(format!("assessmentDate is not a date or timestamp: '{raw}'")))
}

/// Score the questionnaire and persist it against a known person.
pub async fn create_assessment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    JsonBody(req): JsonBody<AssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentCreated>), ApiError> {
    let elderly_id = parse_elderly_id(required("elderlyID", req.elderly_id.as_deref())?)?;
    let assessed_at = match req.assessment_date.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_assessment_date(raw)?,
        None => Timestamp::now(),
    };

    elderly::get(state.store(), &elderly_id).await?;

    let assessment = assessments::create(
        state.store(),
        NewAssessment {
            elderly_id,
            user_id: Some(principal.user_id.clone()),
            indicators: req.answers.into(),
            assessed_at,
        },
    )
    .await?;

    AuditEvent::new(Action::Create, Resource::Assessment, &assessment.id)
        .by(&principal.user_id, principal.role)
        .with_details(serde_json::json!({ "yesCount": assessment.yes_count }))
        .emit();

    Ok((
        StatusCode::CREATED,
        Json(AssessmentCreated {
            ok: true,
            assessment_id: assessment.id,
            yes_count: assessment.yes_count,
            result_text: assessment.result_text,
        }),
    ))
}

/// Assessments newest first, joined with the person's name.
pub async fn list_assessments(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Page<AssessmentRow>>, ApiError> {
    let elderly_id = match q.elderly_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_elderly_id(raw)?),
        None => None,
    };
    let page = page_request(q.page.as_deref(), q.page_size.as_deref());
    let assessments = assessments::list(state.store(), elderly_id.as_deref(), page).await?;

    let names: HashMap<String, String> = elderly::list_active(state.store())
        .await?
        .into_iter()
        .map(|e| (e.id, e.profile.name))
        .collect();

    Ok(Json(assessments.map(|assessment| AssessmentRow {
        elderly_name: names.get(&assessment.elderly_id).cloned(),
        assessment,
    })))
}

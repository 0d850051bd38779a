use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use oacare_audit::events::{Action, AuditEvent, Resource};
use oacare_core::models::analysis::{AnalysisInput, AnalysisRecord, normalize_findings};
use oacare_core::models::civil_date;
use oacare_core::models::elderly::{Address, Elderly};
use oacare_core::page::Page;
use oacare_storage::analysis::{self, NewAnalysis};
use oacare_storage::elderly;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::routes::elderly::parse_elderly_id;
use crate::routes::reports::in_range;
use crate::routes::{optional_date, page_request, required};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisQuery {
    pub search: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// An analysis record with the person it is about. Person fields are empty
/// when that record is gone or soft-deleted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    pub name: Option<String>,
    #[serde(rename = "citizenID")]
    pub citizen_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AnalysisRow {
    fn new(record: AnalysisRecord, person: Option<&Elderly>) -> Self {
        let location = person.and_then(|p| p.profile.location);
        Self {
            record,
            name: person.map(|p| p.profile.name.clone()),
            citizen_id: person.and_then(|p| p.profile.citizen_id.clone()),
            phone: person.and_then(|p| p.profile.phone.clone()),
            address: person.map(|p| p.profile.address.clone()),
            latitude: location.map(|l| l.latitude),
            longitude: location.map(|l| l.longitude),
        }
    }
}

/// Analysis records newest first, searchable over the record and the
/// person's details, optionally bounded by creation date.
pub async fn list_analysis_results(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<AnalysisQuery>,
) -> Result<Json<Page<AnalysisRow>>, ApiError> {
    user.require_report_access()?;
    let from = optional_date("from", q.from.as_deref())?;
    let to = optional_date("to", q.to.as_deref())?;
    let keyword = q.search.as_deref().unwrap_or_default();
    let page = page_request(q.page.as_deref(), q.page_size.as_deref());

    let people: HashMap<String, Elderly> = elderly::list_active(state.store())
        .await?
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();

    let rows: Vec<AnalysisRow> = analysis::list(state.store())
        .await?
        .into_iter()
        .filter(|r| in_range(civil_date(r.created_at), from, to))
        .filter(|r| {
            let person = people.get(&r.elderly_id);
            r.matches(keyword) || person.is_some_and(|p| p.matches(keyword))
        })
        .map(|r| {
            let person = people.get(&r.elderly_id);
            AnalysisRow::new(r, person)
        })
        .collect();

    Ok(Json(page.paginate(rows)))
}

pub async fn create_analysis_result(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(input): JsonBody<AnalysisInput>,
) -> Result<(StatusCode, Json<AnalysisRecord>), ApiError> {
    user.require_report_access()?;
    let elderly_id = parse_elderly_id(required("elderlyID", input.elderly_id.as_deref())?)?;
    let findings = normalize_findings(&input.findings)?;

    let record = analysis::create(
        state.store(),
        NewAnalysis {
            executive_id: user.0.user_id.clone(),
            elderly_id,
            result_id: input.result_id,
            findings,
        },
    )
    .await?;

    AuditEvent::new(Action::Create, Resource::Analysis, &record.id)
        .by(&user.0.user_id, user.0.role)
        .emit();

    Ok((StatusCode::CREATED, Json(record)))
}

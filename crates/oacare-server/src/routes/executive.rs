use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use oacare_core::models::civil_date;
use oacare_core::models::elderly::{Address, Elderly, Gender};
use oacare_core::page::Page;
use oacare_scoring::reporting::{RiskLevel, TimelineEntry, advice, latest_per_elderly, risk_level, timeline};
use oacare_storage::{assessments, elderly};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::elderly::parse_elderly_id;
use crate::routes::reports::in_range;
use crate::routes::{optional_date, page_request, required};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskListQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRow {
    #[serde(rename = "elderlyID")]
    pub elderly_id: String,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    #[serde(rename = "citizenID")]
    pub citizen_id: Option<String>,
    pub phone: Option<String>,
    pub district: String,
    pub province: String,
    pub last_assessment_date: Timestamp,
    pub yes_count: u8,
    pub risk_label: RiskLevel,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct RiskList {
    pub range: DateRange,
    #[serde(flatten)]
    pub page: Page<RiskRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    #[serde(rename = "elderlyID")]
    pub elderly_id: String,
    pub name: String,
    pub gender: Gender,
    pub age: i32,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct RiskDetail {
    pub profile: RiskProfile,
    pub latest: Option<TimelineEntry>,
    pub advice: &'static str,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    pub citizen: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPerson {
    #[serde(rename = "elderlyID")]
    pub elderly_id: String,
    pub name: String,
    #[serde(rename = "citizenID")]
    pub citizen_id: Option<String>,
    pub phone: Option<String>,
    pub gender: Gender,
    pub address: Address,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// The coordinate in the composite `"lat,lng"` form.
    pub latlong: Option<String>,
}

fn today() -> Date {
    civil_date(Timestamp::now())
}

/// People whose latest assessment in the date range has 2 to 5 affirmative
/// answers, most recently assessed first.
pub async fn risk_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<RiskListQuery>,
) -> Result<Json<RiskList>, ApiError> {
    user.require_report_access()?;
    let start = optional_date("start", q.start.as_deref())?;
    let end = optional_date("end", q.end.as_deref())?;
    let keyword = q.search.as_deref().unwrap_or_default();
    let page = page_request(q.page.as_deref(), q.page_size.as_deref());

    let mut history = assessments::all(state.store()).await?;
    history.retain(|a| in_range(a.assessed_on(), start, end));
    let latest = latest_per_elderly(&history);

    let people: HashMap<String, Elderly> = elderly::list_active(state.store())
        .await?
        .into_iter()
        .filter(|e| e.matches(keyword))
        .map(|e| (e.id.clone(), e))
        .collect();

    let today = today();
    let mut rows: Vec<RiskRow> = latest
        .values()
        .filter(|a| (2..=5).contains(&a.yes_count))
        .filter_map(|a| {
            let e = people.get(&a.elderly_id)?;
            Some(RiskRow {
                elderly_id: e.id.clone(),
                name: e.profile.name.clone(),
                gender: e.profile.gender,
                age: e.age_on(today),
                citizen_id: e.profile.citizen_id.clone(),
                phone: e.profile.phone.clone(),
                district: e.profile.address.district.clone(),
                province: e.profile.address.province.clone(),
                last_assessment_date: a.assessed_at,
                yes_count: a.yes_count,
                risk_label: risk_level(a.yes_count),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.last_assessment_date.cmp(&a.last_assessment_date));

    Ok(Json(RiskList {
        range: DateRange { start, end },
        page: page.paginate(rows),
    }))
}

/// One person's risk profile with advice and full timeline.
pub async fn risk_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(elderly_id): Path<String>,
) -> Result<Json<RiskDetail>, ApiError> {
    user.require_report_access()?;
    let id = parse_elderly_id(&elderly_id)?;
    let person = elderly::get(state.store(), &id).await?;
    let history = assessments::history(state.store(), &id).await?;

    let timeline = timeline(&history);
    let latest = timeline.first().cloned();

    Ok(Json(RiskDetail {
        profile: RiskProfile {
            age: person.age_on(today()),
            address: person.profile.address.one_line(),
            elderly_id: person.id,
            name: person.profile.name,
            gender: person.profile.gender,
        },
        advice: advice(latest.as_ref()),
        latest,
        timeline,
    }))
}

/// Find one person by citizen id for the map view.
pub async fn map_lookup(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<MapQuery>,
) -> Result<Json<MapPerson>, ApiError> {
    user.require_report_access()?;
    let citizen_id = required("citizen", q.citizen.as_deref())?;
    let person = elderly::find_by_citizen_id(state.store(), citizen_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no elderly with citizen id {citizen_id}")))?;

    let location = person.profile.location;
    Ok(Json(MapPerson {
        elderly_id: person.id,
        name: person.profile.name,
        citizen_id: person.profile.citizen_id,
        phone: person.profile.phone,
        gender: person.profile.gender,
        address: person.profile.address,
        latitude: location.map(|p| p.latitude),
        longitude: location.map(|p| p.longitude),
        latlong: location.map(|p| p.to_composite()),
    }))
}

use std::collections::{HashMap, HashSet};

use axum::Json;
use axum::extract::{Query, State};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use oacare_core::geo::GeoPoint;
use oacare_core::ids::compare_codes;
use oacare_core::models::assessment::Assessment;
use oacare_core::models::elderly::{Address, Elderly, Gender};
use oacare_core::page::Page;
use oacare_scoring::reporting::{
    AgeGenderMatrix, DemographicRow, TrendRow, YearCount, aggregate_by_gender_and_age_band, default_bands,
    latest_per_elderly, positive_counts_by_year, trend,
};
use oacare_scoring::triage::{TravelAssessment, TravelThresholds, assess_travel};
use oacare_storage::store::ObjectStore;
use oacare_storage::{assessments, elderly};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::{optional_date, page_request};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendQuery {
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendFilter {
    pub start_year: Option<i16>,
    pub end_year: Option<i16>,
}

#[derive(Debug, Serialize)]
pub struct TrendReport {
    pub series: Vec<YearCount>,
    pub filter: TrendFilter,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub hospital_lat: Option<String>,
    pub hospital_lng: Option<String>,
    pub max_self_travel_km: Option<String>,
    pub consider_escort_km: Option<String>,
    pub force_pickup_km: Option<String>,
}

/// One person on the OA map: profile, coordinate and latest screening.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRow {
    #[serde(rename = "elderlyID")]
    pub elderly_id: String,
    pub name: String,
    #[serde(rename = "citizenID")]
    pub citizen_id: Option<String>,
    pub phone: Option<String>,
    pub gender: Gender,
    pub birth_date: Date,
    pub address: Address,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub latest_assessment: Option<Assessment>,
}

impl MapRow {
    fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TravelRow {
    #[serde(flatten)]
    pub person: MapRow,
    #[serde(flatten)]
    pub travel: TravelAssessment,
}

#[derive(Debug, Serialize)]
pub struct TravelReport {
    pub facility: GeoPoint,
    pub thresholds: TravelThresholds,
    #[serde(flatten)]
    pub page: Page<TravelRow>,
}

pub(crate) fn in_range(date: Date, start: Option<Date>, end: Option<Date>) -> bool {
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

fn parse_year(field: &str, raw: Option<&str>) -> Result<Option<i16>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<i16>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{field} must be a year, got '{s}'"))),
    }
}

fn parse_number(field: &str, raw: Option<&str>, default: f64) -> Result<f64, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ApiError::BadRequest(format!("{field} must be a number, got '{s}'"))),
    }
}

fn parse_km(field: &str, raw: Option<&str>, default: f64) -> Result<f64, ApiError> {
    let km = parse_number(field, raw, default)?;
    if km < 0.0 {
        return Err(ApiError::BadRequest(format!("{field} must not be negative")));
    }
    Ok(km)
}

/// Age-band by gender counts over every assessment in the date range, with
/// age taken on the assessment date.
pub async fn knee_oa(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<DateRangeQuery>,
) -> Result<Json<AgeGenderMatrix>, ApiError> {
    user.require_report_access()?;
    let start = optional_date("start", q.start.as_deref())?;
    let end = optional_date("end", q.end.as_deref())?;

    let people: HashMap<String, Elderly> = elderly::list_active(state.store())
        .await?
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();

    let rows: Vec<DemographicRow> = assessments::all(state.store())
        .await?
        .iter()
        .filter(|a| in_range(a.assessed_on(), start, end))
        .filter_map(|a| {
            let person = people.get(&a.elderly_id)?;
            Some(DemographicRow {
                gender: person.profile.gender.into(),
                age_years: person.age_on(a.assessed_on()),
            })
        })
        .collect();

    Ok(Json(aggregate_by_gender_and_age_band(&rows, &default_bands())))
}

/// Yearly count of assessments meeting the aggregate-report rule. Like
/// `knee_oa`, only assessments of active elderly are counted.
pub async fn yearly_trend(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<TrendQuery>,
) -> Result<Json<TrendReport>, ApiError> {
    user.require_report_access()?;
    let start_year = parse_year("startYear", q.start_year.as_deref())?;
    let end_year = parse_year("endYear", q.end_year.as_deref())?;

    let active: HashSet<String> = elderly::list_active(state.store())
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();
    let history = assessments::all(state.store()).await?;
    let rows: Vec<TrendRow<'_>> = history
        .iter()
        .filter(|a| active.contains(&a.elderly_id))
        .map(|a| TrendRow {
            year: a.assessed_on().year(),
            yes_count: a.yes_count,
            result_text: &a.result_text,
        })
        .collect();

    Ok(Json(TrendReport {
        series: trend(&positive_counts_by_year(&rows), start_year, end_year),
        filter: TrendFilter { start_year, end_year },
    }))
}

/// Active people matching `keyword`, newest id first, each with their latest
/// assessment.
async fn map_rows(store: &dyn ObjectStore, keyword: &str) -> Result<Vec<MapRow>, ApiError> {
    let history = assessments::all(store).await?;
    let latest = latest_per_elderly(&history);

    let mut people = elderly::list_active(store).await?;
    people.retain(|e| e.matches(keyword));
    people.sort_by(|a, b| compare_codes(&b.id, &a.id));

    Ok(people
        .into_iter()
        .map(|e| {
            let latest_assessment = latest.get(e.id.as_str()).map(|a| (*a).clone());
            let location = e.profile.location;
            MapRow {
                elderly_id: e.id,
                name: e.profile.name,
                citizen_id: e.profile.citizen_id,
                phone: e.profile.phone,
                gender: e.profile.gender,
                birth_date: e.profile.birth_date,
                address: e.profile.address,
                latitude: location.map(|p| p.latitude),
                longitude: location.map(|p| p.longitude),
                latest_assessment,
            }
        })
        .collect())
}

pub async fn maps_oa(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<MapQuery>,
) -> Result<Json<Page<MapRow>>, ApiError> {
    user.require_report_access()?;
    let page = page_request(q.page.as_deref(), q.page_size.as_deref());
    let rows = map_rows(state.store(), q.search.as_deref().unwrap_or_default()).await?;
    Ok(Json(page.paginate(rows)))
}

/// The map rows with distance to the facility, OA severity and a travel
/// decision. Facility and thresholds default to the configured ones.
pub async fn travel(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<TravelQuery>,
) -> Result<Json<TravelReport>, ApiError> {
    user.require_report_access()?;
    let configured = &state.config;

    let facility = match (q.hospital_lat.as_deref(), q.hospital_lng.as_deref()) {
        (None, None) => configured.hospital,
        (lat, lng) => {
            let lat = parse_number("hospitalLat", lat, configured.hospital.latitude)?;
            let lng = parse_number("hospitalLng", lng, configured.hospital.longitude)?;
            GeoPoint::new(lat, lng)?
        }
    };
    let thresholds = TravelThresholds {
        max_self_travel_km: parse_km(
            "maxSelfTravelKm",
            q.max_self_travel_km.as_deref(),
            configured.travel.max_self_travel_km,
        )?,
        consider_escort_km: parse_km(
            "considerEscortKm",
            q.consider_escort_km.as_deref(),
            configured.travel.consider_escort_km,
        )?,
        force_pickup_km: parse_km(
            "forcePickupKm",
            q.force_pickup_km.as_deref(),
            configured.travel.force_pickup_km,
        )?,
    }
    .clamped();

    let page = page_request(q.page.as_deref(), q.page_size.as_deref());
    let rows = map_rows(state.store(), q.search.as_deref().unwrap_or_default()).await?;
    let page = page.paginate(rows).map(|person| {
        let yes_count = person.latest_assessment.as_ref().map(|a| a.yes_count);
        let travel = assess_travel(person.location(), facility, yes_count, &thresholds);
        TravelRow { person, travel }
    });

    Ok(Json(TravelReport {
        facility,
        thresholds,
        page,
    }))
}

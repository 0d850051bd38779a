use serde::{Deserialize, Serialize};
use ts_rs::TS;

use oacare_core::geo::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres. `None` if any input is missing or not
/// finite.
pub fn great_circle_distance_km(
    lat1: Option<f64>,
    lon1: Option<f64>,
    lat2: Option<f64>,
    lon2: Option<f64>,
) -> Option<f64> {
    let (lat1, lon1, lat2, lon2) = (lat1?, lon1?, lat2?, lon2?);
    if ![lat1, lon1, lat2, lon2].iter().all(|v| v.is_finite()) {
        return None;
    }

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    Some(EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt()))
}

pub fn distance_between(a: Option<GeoPoint>, b: GeoPoint) -> Option<f64> {
    let a = a?;
    great_circle_distance_km(Some(a.latitude), Some(a.longitude), Some(b.latitude), Some(b.longitude))
}

/// OA severity for travel planning. Not the same buckets as the screening
/// result or the risk levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Severity {
    #[serde(rename = "severe")]
    Severe,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "mild/none")]
    MildOrNone,
}

pub fn severity(yes_count: u8) -> Severity {
    match yes_count {
        4.. => Severity::Severe,
        2..=3 => Severity::Moderate,
        _ => Severity::MildOrNone,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TravelThresholds {
    pub max_self_travel_km: f64,
    pub consider_escort_km: f64,
    pub force_pickup_km: f64,
}

impl Default for TravelThresholds {
    fn default() -> Self {
        Self {
            max_self_travel_km: 5.0,
            consider_escort_km: 10.0,
            force_pickup_km: 20.0,
        }
    }
}

impl TravelThresholds {
    /// Raise later thresholds so that
    /// `max_self_travel_km <= consider_escort_km <= force_pickup_km`.
    pub fn clamped(self) -> Self {
        let consider_escort_km = self.consider_escort_km.max(self.max_self_travel_km);
        Self {
            max_self_travel_km: self.max_self_travel_km,
            consider_escort_km,
            force_pickup_km: self.force_pickup_km.max(consider_escort_km),
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.max_self_travel_km <= self.consider_escort_km && self.consider_escort_km <= self.force_pickup_km
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TravelDecision {
    #[serde(rename = "needs verification")]
    NeedsVerification,
    #[serde(rename = "self-transport")]
    SelfTransport,
    #[serde(rename = "consider escort / family transport")]
    ConsiderEscort,
    #[serde(rename = "facility pickup required")]
    FacilityPickup,
}

impl TravelDecision {
    /// Escalation rank among the decisions that have a distance.
    pub fn escalation(self) -> Option<u8> {
        match self {
            TravelDecision::NeedsVerification => None,
            TravelDecision::SelfTransport => Some(0),
            TravelDecision::ConsiderEscort => Some(1),
            TravelDecision::FacilityPickup => Some(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TravelAdvice {
    pub decision: TravelDecision,
    pub reason: &'static str,
}

/// Decide how a person should get to the facility.
///
/// Total for any threshold ordering; out-of-order thresholds only change
/// which branch wins.
pub fn decide_travel(distance_km: Option<f64>, severity: Severity, t: &TravelThresholds) -> TravelAdvice {
    let Some(d) = distance_km.filter(|d| d.is_finite()) else {
        return TravelAdvice {
            decision: TravelDecision::NeedsVerification,
            reason: "no coordinate",
        };
    };

    if d > t.force_pickup_km || (severity == Severity::Severe && d > t.max_self_travel_km) {
        TravelAdvice {
            decision: TravelDecision::FacilityPickup,
            reason: "severe OA or long distance",
        }
    } else if severity == Severity::Moderate || d > t.consider_escort_km {
        TravelAdvice {
            decision: TravelDecision::ConsiderEscort,
            reason: "moderate OA or medium distance",
        }
    } else {
        TravelAdvice {
            decision: TravelDecision::SelfTransport,
            reason: "nearby and mild OA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelAssessment {
    pub yes_count: u8,
    pub severity: Severity,
    pub distance_km: Option<f64>,
    pub decision: TravelDecision,
    pub reason: &'static str,
}

/// Distance, severity and decision for one person. A person never screened
/// counts as zero affirmative answers.
pub fn assess_travel(
    home: Option<GeoPoint>,
    facility: GeoPoint,
    yes_count: Option<u8>,
    thresholds: &TravelThresholds,
) -> TravelAssessment {
    let yes_count = yes_count.unwrap_or(0);
    let severity = severity(yes_count);
    let distance_km = distance_between(home, facility);
    let advice = decide_travel(distance_km, severity, thresholds);
    TravelAssessment {
        yes_count,
        severity,
        distance_km,
        decision: advice.decision,
        reason: advice.reason,
    }
}

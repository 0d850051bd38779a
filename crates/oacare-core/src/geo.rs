use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A WGS84 coordinate. Latitude and longitude are present or absent together,
/// so a record holds `Option<GeoPoint>` rather than two independent options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::InvalidCoordinate(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::InvalidCoordinate(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Combine two nullable fields. A half-present pair is an error so callers
    /// never persist a latitude without its longitude.
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, CoreError> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            (None, None) => Ok(None),
            _ => Err(CoreError::InvalidCoordinate(
                "latitude and longitude must be given together".to_string(),
            )),
        }
    }

    /// Parse the legacy composite `"lat,lng"` column. Separators may be a
    /// comma, whitespace, or both. Anything unparseable yields `None`.
    pub fn parse_composite(raw: &str) -> Option<Self> {
        let mut parts = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty());
        let lat = parts.next()?.parse::<f64>().ok()?;
        let lng = parts.next()?.parse::<f64>().ok()?;
        Self::new(lat, lng).ok()
    }

    /// Format as the legacy composite `"lat,lng"` column.
    pub fn to_composite(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

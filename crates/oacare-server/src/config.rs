use std::env;
use std::time::Duration;

use oacare_core::geo::GeoPoint;
use oacare_scoring::triage::TravelThresholds;
use oacare_storage::elderly::DeletePolicy;
use thiserror::Error;

pub const DEV_JWT_SECRET: &str = "devsecret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}={value}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    S3 { bucket: String },
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub storage: StorageBackend,
    pub bind: String,
    pub jwt_secret: String,
    /// Role secret required to self-register as admin. `None` refuses it.
    pub admin_secret: Option<String>,
    pub executive_secret: Option<String>,
    pub delete_policy: DeletePolicy,
    pub request_timeout: Duration,
    pub cookie_secure: bool,
    pub hospital: GeoPoint,
    pub travel: TravelThresholds,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from any variable lookup. Unset and blank variables take their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let storage = match get("OACARE_STORAGE").as_deref() {
            None | Some("memory") => StorageBackend::Memory,
            Some("s3") => StorageBackend::S3 {
                bucket: get("OACARE_BUCKET").unwrap_or_else(|| "oacare".to_string()),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "OACARE_STORAGE",
                    value: other.to_string(),
                    reason: "expected memory or s3".to_string(),
                });
            }
        };

        let delete_policy = match get("OACARE_DELETE_POLICY") {
            None => DeletePolicy::Soft,
            Some(raw) => DeletePolicy::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "OACARE_DELETE_POLICY",
                value: raw.clone(),
                reason: "expected soft or hard".to_string(),
            })?,
        };

        let hospital_lat = parse_number(&get, "OACARE_HOSPITAL_LAT", 14.9948)?;
        let hospital_lng = parse_number(&get, "OACARE_HOSPITAL_LNG", 103.1039)?;
        let hospital = GeoPoint::new(hospital_lat, hospital_lng).map_err(|e| ConfigError::Invalid {
            var: "OACARE_HOSPITAL_LAT",
            value: format!("{hospital_lat},{hospital_lng}"),
            reason: e.to_string(),
        })?;

        let defaults = TravelThresholds::default();
        let travel = TravelThresholds {
            max_self_travel_km: parse_number(&get, "OACARE_MAX_SELF_TRAVEL_KM", defaults.max_self_travel_km)?,
            consider_escort_km: parse_number(&get, "OACARE_CONSIDER_ESCORT_KM", defaults.consider_escort_km)?,
            force_pickup_km: parse_number(&get, "OACARE_FORCE_PICKUP_KM", defaults.force_pickup_km)?,
        }
        .clamped();

        let timeout_secs = parse_number(&get, "OACARE_REQUEST_TIMEOUT_SECS", 15.0)?;
        if timeout_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                var: "OACARE_REQUEST_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let cookie_secure = match get("OACARE_COOKIE_SECURE").as_deref() {
            None => false,
            Some(raw) => matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        };

        Ok(Self {
            storage,
            bind: get("OACARE_BIND").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            jwt_secret: get("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            admin_secret: get("ADMIN_SECRET"),
            executive_secret: get("EXECUTIVE_SECRET"),
            delete_policy,
            request_timeout: Duration::from_secs_f64(timeout_secs),
            cookie_secure,
            hospital,
            travel,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_number(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    match get(var) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConfigError::Invalid {
                var,
                value: raw.clone(),
                reason: "expected a number".to_string(),
            }),
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid id '{value}': expected {prefix} followed by at least 3 digits")]
    InvalidId { prefix: &'static str, value: String },

    #[error("citizen id must be 13 digits: {0}")]
    InvalidCitizenId(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

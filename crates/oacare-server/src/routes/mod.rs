pub mod analysis;
pub mod assessment_results;
pub mod assessments;
pub mod auth;
pub mod elderly;
pub mod executive;
pub mod health;
pub mod health_info;
pub mod reports;
pub mod users;

use jiff::civil::Date;
use oacare_core::page::PageRequest;

use crate::error::ApiError;

/// Lenient paging from raw query values: unparseable input falls back to the
/// defaults, out-of-range input is clamped.
pub(crate) fn page_request(page: Option<&str>, page_size: Option<&str>) -> PageRequest {
    let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<i64>().ok());
    PageRequest::new(parse(page), parse(page_size))
}

/// An optional `YYYY-MM-DD` query value. Blank counts as absent.
pub(crate) fn optional_date(field: &str, raw: Option<&str>) -> Result<Option<Date>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<Date>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{field} must be a date (YYYY-MM-DD), got '{s}'"))),
    }
}

/// A non-blank string field, or 400 naming the field.
pub(crate) fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{field} is required")))
}

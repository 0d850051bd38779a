pub mod analysis;
pub mod assessment;
pub mod assessment_result;
pub mod elderly;
pub mod health_info;
pub mod user;

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::Timestamp;

/// Calendar date of a timestamp. Reports bucket by UTC calendar day.
pub fn civil_date(ts: Timestamp) -> Date {
    ts.to_zoned(TimeZone::UTC).date()
}

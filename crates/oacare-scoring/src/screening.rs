use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use oacare_core::models::assessment::Indicators;

/// Affirmative answers needed for the positive per-assessment result.
pub const SCREENING_THRESHOLD: u8 = 2;

pub const POSITIVE_RESULT: &str = "มีโอกาสที่จะเป็นโรคข้อเข่าเสื่อม";
pub const NEGATIVE_RESULT: &str = "ไม่เป็นโรคข้อเข่าเสื่อมตามเกณฑ์นี้";

/// Affirmative answers needed for an assessment to count in aggregate
/// epidemiological reports (yearly trend).
pub const REPORTING_THRESHOLD: u8 = 3;

/// Disease keyword that also qualifies a result text for aggregate reports.
pub const REPORTING_KEYWORD: &str = "เข่าเสื่อม";

const TRUTHY: &[&str] = &["1", "true", "yes", "ใช่"];

/// Coerce a loosely typed answer to a strict boolean.
///
/// `true`, `1`, `"1"`, `"true"`, `"yes"` and `"ใช่"` are affirmative.
/// Everything else, including `null`, `2` and `"no"`, is false.
pub fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => {
            let s = s.trim();
            TRUTHY.iter().any(|t| s.eq_ignore_ascii_case(t))
        }
        _ => false,
    }
}

/// A questionnaire answer whose deserialization never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(pub bool);

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Flag(coerce_flag(&value)))
    }
}

/// The five answers as submitted by the intake form or the API.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Answers {
    pub stiffness: Flag,
    pub crepitus: Flag,
    pub bony_tenderness: Flag,
    pub bony_enlargement: Flag,
    pub no_warmth: Flag,
}

impl From<Answers> for Indicators {
    fn from(a: Answers) -> Self {
        Indicators::from_array([
            a.stiffness.0,
            a.crepitus.0,
            a.bony_tenderness.0,
            a.bony_enlargement.0,
            a.no_warmth.0,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screening {
    pub yes_count: u8,
    pub result_text: &'static str,
}

pub fn yes_count(indicators: &Indicators) -> u8 {
    indicators.as_array().iter().filter(|&&answer| answer).count() as u8
}

pub fn result_text(yes_count: u8) -> &'static str {
    if yes_count >= SCREENING_THRESHOLD {
        POSITIVE_RESULT
    } else {
        NEGATIVE_RESULT
    }
}

pub fn score(indicators: &Indicators) -> Screening {
    let yes_count = yes_count(indicators);
    Screening {
        yes_count,
        result_text: result_text(yes_count),
    }
}

/// Aggregate-report rule: `yes_count >= 3`, or a result text that mentions
/// the disease keyword.
pub fn counts_toward_reports(yes_count: u8, result_text: &str) -> bool {
    yes_count >= REPORTING_THRESHOLD || result_text.contains(REPORTING_KEYWORD)
}

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use oacare_core::ids::compare_codes;
use oacare_core::models::assessment::Assessment;
use oacare_core::models::elderly::Gender;

use crate::screening::counts_toward_reports;

/// An inclusive age range. `max: None` is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgeBand {
    pub key: String,
    pub min: u32,
    pub max: Option<u32>,
}

impl AgeBand {
    pub fn new(key: impl Into<String>, min: u32, max: Option<u32>) -> Self {
        Self {
            key: key.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, age: i32) -> bool {
        let Ok(age) = u32::try_from(age) else {
            return false;
        };
        age >= self.min && self.max.is_none_or(|max| age <= max)
    }
}

/// `60-69`, `70-79` and an unbounded `80+`.
pub fn default_bands() -> Vec<AgeBand> {
    vec![
        AgeBand::new("60-69", 60, Some(69)),
        AgeBand::new("70-79", 70, Some(79)),
        AgeBand::new("80+", 80, None),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GenderBucket {
    Male,
    Female,
    Unknown,
}

impl GenderBucket {
    pub const ALL: [GenderBucket; 3] = [GenderBucket::Male, GenderBucket::Female, GenderBucket::Unknown];
}

impl From<Gender> for GenderBucket {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => GenderBucket::Male,
            Gender::Female => GenderBucket::Female,
            Gender::Unspecified => GenderBucket::Unknown,
        }
    }
}

/// One screened person: gender and age on the assessment date.
#[derive(Debug, Clone, Copy)]
pub struct DemographicRow {
    pub gender: GenderBucket,
    pub age_years: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGenderMatrix {
    pub bands: Vec<String>,
    pub by_gender: BTreeMap<GenderBucket, BTreeMap<String, u64>>,
    pub totals: BTreeMap<String, u64>,
    pub grand_total: u64,
}

/// Count rows per gender and age band.
///
/// Every gender bucket and band is present with zero counts. A row is counted
/// in the first band containing its age and dropped if none does.
pub fn aggregate_by_gender_and_age_band(rows: &[DemographicRow], bands: &[AgeBand]) -> AgeGenderMatrix {
    let zeroed: BTreeMap<String, u64> = bands.iter().map(|b| (b.key.clone(), 0)).collect();
    let mut by_gender: BTreeMap<GenderBucket, BTreeMap<String, u64>> =
        GenderBucket::ALL.iter().map(|g| (*g, zeroed.clone())).collect();
    let mut totals = zeroed;
    let mut grand_total = 0;

    for row in rows {
        let Some(band) = bands.iter().find(|b| b.contains(row.age_years)) else {
            continue;
        };
        if let Some(count) = by_gender.get_mut(&row.gender).and_then(|m| m.get_mut(&band.key)) {
            *count += 1;
        }
        if let Some(count) = totals.get_mut(&band.key) {
            *count += 1;
        }
        grand_total += 1;
    }

    AgeGenderMatrix {
        bands: bands.iter().map(|b| b.key.clone()).collect(),
        by_gender,
        totals,
        grand_total,
    }
}

/// Input to the yearly trend: one assessment reduced to what the reporting
/// rule needs.
#[derive(Debug, Clone, Copy)]
pub struct TrendRow<'a> {
    pub year: i16,
    pub yes_count: u8,
    pub result_text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct YearCount {
    pub year: i16,
    pub count: u64,
}

/// Count assessments that meet the aggregate-report rule, per year.
pub fn positive_counts_by_year(rows: &[TrendRow<'_>]) -> Vec<YearCount> {
    let mut per_year: BTreeMap<i16, u64> = BTreeMap::new();
    for row in rows.iter().filter(|r| counts_toward_reports(r.yes_count, r.result_text)) {
        *per_year.entry(row.year).or_default() += 1;
    }
    per_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Yearly series within the optional inclusive `[start_year, end_year]`,
/// ascending by year, duplicate years merged.
pub fn trend(rows: &[YearCount], start_year: Option<i16>, end_year: Option<i16>) -> Vec<YearCount> {
    let mut per_year: BTreeMap<i16, u64> = BTreeMap::new();
    for row in rows {
        if start_year.is_some_and(|start| row.year < start) || end_year.is_some_and(|end| row.year > end) {
            continue;
        }
        *per_year.entry(row.year).or_default() += row.count;
    }
    per_year
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RiskLevel {
    #[serde(rename = "low risk")]
    Low,
    #[serde(rename = "moderate risk")]
    Moderate,
    #[serde(rename = "high risk")]
    High,
    #[serde(rename = "clear indication")]
    ClearIndication,
    #[serde(rename = "out of criteria")]
    OutOfCriteria,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low risk",
            RiskLevel::Moderate => "moderate risk",
            RiskLevel::High => "high risk",
            RiskLevel::ClearIndication => "clear indication",
            RiskLevel::OutOfCriteria => "out of criteria",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            RiskLevel::Low => {
                "behaviour change: weight control, strengthen the muscles around the knee, re-screen later"
            }
            RiskLevel::Moderate => {
                "re-assessment: schedule a follow-up screening and refer to a physician or physiotherapist"
            }
            RiskLevel::High => {
                "diagnostic workup: X-ray and physical examination, start physiotherapy or supportive medication"
            }
            RiskLevel::ClearIndication => {
                "specialist referral: refer to an orthopaedic specialist and plan active treatment"
            }
            RiskLevel::OutOfCriteria => "not within the 2-5 criteria yet",
        }
    }
}

/// Risk level for the executive risk views. Defined for 2 through 5.
pub fn risk_level(yes_count: u8) -> RiskLevel {
    match yes_count {
        2 => RiskLevel::Low,
        3 => RiskLevel::Moderate,
        4 => RiskLevel::High,
        5 => RiskLevel::ClearIndication,
        _ => RiskLevel::OutOfCriteria,
    }
}

pub const NO_ASSESSMENT_ADVICE: &str = "no assessment yet";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(rename = "assessmentID")]
    pub assessment_id: String,
    pub date: jiff::Timestamp,
    pub yes_count: u8,
    pub risk_label: RiskLevel,
    pub result_text: String,
}

/// A person's assessment history, newest first.
pub fn timeline(history: &[Assessment]) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = history
        .iter()
        .map(|a| TimelineEntry {
            assessment_id: a.id.clone(),
            date: a.assessed_at,
            yes_count: a.yes_count,
            risk_label: risk_level(a.yes_count),
            result_text: a.result_text.clone(),
        })
        .collect();
    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| compare_codes(&b.assessment_id, &a.assessment_id))
    });
    entries
}

pub fn advice(latest: Option<&TimelineEntry>) -> &'static str {
    match latest {
        Some(entry) => entry.risk_label.advice(),
        None => NO_ASSESSMENT_ADVICE,
    }
}

/// Newest first: later `assessed_at`, then the higher-numbered id.
pub fn newer_first(a: &Assessment, b: &Assessment) -> Ordering {
    b.assessed_at
        .cmp(&a.assessed_at)
        .then_with(|| compare_codes(&b.id, &a.id))
}

/// Each person's most recent assessment, keyed by elderly id. Same-instant
/// assessments resolve to the higher-numbered id.
pub fn latest_per_elderly(history: &[Assessment]) -> BTreeMap<&str, &Assessment> {
    let mut latest: BTreeMap<&str, &Assessment> = BTreeMap::new();
    for assessment in history {
        latest
            .entry(assessment.elderly_id.as_str())
            .and_modify(|current| {
                if newer_first(assessment, current) == Ordering::Less {
                    *current = assessment;
                }
            })
            .or_insert(assessment);
    }
    latest
}

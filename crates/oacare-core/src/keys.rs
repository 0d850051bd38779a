//! Object key conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of records in the OA Care bucket.

use uuid::Uuid;

pub const ELDERLY_PREFIX: &str = "elderly/";

pub fn elderly(id: &str) -> String {
    format!("elderly/{id}.json")
}

/// Uniqueness claim for a citizen id, pointing at the elderly record that
/// holds it.
pub fn citizen_index(citizen_id: &str) -> String {
    format!("index/citizen/{citizen_id}.json")
}

pub const ASSESSMENTS_PREFIX: &str = "assessments/";

pub fn assessment(id: &str) -> String {
    format!("assessments/{id}.json")
}

pub const ASSESSMENT_RESULTS_PREFIX: &str = "assessment_results/";

pub fn assessment_results_prefix(assessment_id: &str) -> String {
    format!("assessment_results/{assessment_id}/")
}

pub fn assessment_result(assessment_id: &str, id: Uuid) -> String {
    format!("assessment_results/{assessment_id}/{id}.json")
}

pub const ANALYSIS_PREFIX: &str = "analysis/";

pub fn analysis(id: &str) -> String {
    format!("analysis/{id}.json")
}

pub const USERS_PREFIX: &str = "users/";

/// Users are keyed by username so login is a single GET.
pub fn user(username: &str) -> String {
    format!("users/{username}.json")
}

pub const HEALTH_INFO_PREFIX: &str = "health_info/";

pub fn health_info(id: Uuid) -> String {
    format!("health_info/{id}.json")
}

pub const SEQUENCES: &str = "_state/sequences.json";

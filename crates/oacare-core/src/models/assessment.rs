use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The five binary indicators of the knee OA screening questionnaire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Indicators {
    pub stiffness: bool,
    pub crepitus: bool,
    pub bony_tenderness: bool,
    pub bony_enlargement: bool,
    pub no_warmth: bool,
}

impl Indicators {
    pub fn as_array(&self) -> [bool; 5] {
        [
            self.stiffness,
            self.crepitus,
            self.bony_tenderness,
            self.bony_enlargement,
            self.no_warmth,
        ]
    }

    pub fn from_array([stiffness, crepitus, bony_tenderness, bony_enlargement, no_warmth]: [bool; 5]) -> Self {
        Self {
            stiffness,
            crepitus,
            bony_tenderness,
            bony_enlargement,
            no_warmth,
        }
    }
}

/// One completed screening event. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Assessment {
    #[serde(rename = "assessmentID")]
    pub id: String,
    #[serde(rename = "elderlyID")]
    pub elderly_id: String,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    #[serde(rename = "assessmentDate")]
    pub assessed_at: jiff::Timestamp,
    #[serde(flatten)]
    pub indicators: Indicators,
    pub yes_count: u8,
    pub result_text: String,
}

impl Assessment {
    pub fn assessed_on(&self) -> jiff::civil::Date {
        super::civil_date(self.assessed_at)
    }
}

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    /// Any value other than the literal `male` / `female`.
    #[default]
    #[serde(other)]
    Unspecified,
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Address {
    pub street: String,
    pub subdistrict: String,
    pub district: String,
    pub province: String,
}

impl Address {
    /// Single-line form, skipping empty parts.
    pub fn one_line(&self) -> String {
        [
            self.street.as_str(),
            self.subdistrict.as_str(),
            self.district.as_str(),
            self.province.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// The mutable part of an elderly record: everything a registrar may edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ElderlyProfile {
    pub name: String,
    pub phone: Option<String>,
    #[serde(rename = "citizenID")]
    pub citizen_id: Option<String>,
    pub birth_date: Date,
    pub gender: Gender,
    pub address: Address,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Elderly {
    pub id: String,
    /// User id of the registrar who created the record.
    pub registered_by: Option<String>,
    #[serde(flatten)]
    pub profile: ElderlyProfile,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
    pub deleted_at: Option<jiff::Timestamp>,
}

impl Elderly {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn age_on(&self, on: Date) -> i32 {
        age_on(self.profile.birth_date, on)
    }

    /// Case-insensitive substring match over name, phone, citizen id and
    /// every address part.
    pub fn matches(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let p = &self.profile;
        [
            Some(p.name.as_str()),
            p.phone.as_deref(),
            p.citizen_id.as_deref(),
            Some(p.address.street.as_str()),
            Some(p.address.subdistrict.as_str()),
            Some(p.address.district.as_str()),
            Some(p.address.province.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Whole years between `birth` and `on`.
pub fn age_on(birth: Date, on: Date) -> i32 {
    let mut years = i32::from(on.year()) - i32::from(birth.year());
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

/// Request body for creating or replacing an elderly record.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ElderlyInput {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "citizenID")]
    pub citizen_id: Option<String>,
    pub birth_date: Date,
    #[serde(default)]
    pub gender: Gender,
    pub address: Address,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl ElderlyInput {
    /// Trim, validate required fields and normalize the coordinate pair.
    pub fn into_profile(self) -> Result<ElderlyProfile, CoreError> {
        let name = required("name", &self.name)?;
        let address = Address {
            street: required("address.street", &self.address.street)?,
            subdistrict: required("address.subdistrict", &self.address.subdistrict)?,
            district: required("address.district", &self.address.district)?,
            province: required("address.province", &self.address.province)?,
        };

        let citizen_id = match self.citizen_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(id) if id.len() == 13 && id.bytes().all(|b| b.is_ascii_digit()) => {
                Some(id.to_string())
            }
            Some(id) => return Err(CoreError::InvalidCitizenId(id.to_string())),
        };

        let phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(ElderlyProfile {
            name,
            phone,
            citizen_id,
            birth_date: self.birth_date,
            gender: self.gender,
            address,
            location: GeoPoint::from_parts(self.latitude, self.longitude)?,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::MissingField(field.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

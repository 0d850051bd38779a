use jiff::Timestamp;
use oacare_core::geo::GeoPoint;
use oacare_core::ids::{CodeKind, compare_codes};
use oacare_core::keys;
use oacare_core::models::elderly::{Elderly, ElderlyProfile};
use oacare_core::page::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::StorageError;
use crate::sequence;
use crate::state::{create_state, load_all_values, load_optional, load_state, save_state, save_state_if_match};
use crate::store::ObjectStore;

const KIND: &str = "elderly";

/// What `delete` does with the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Stamp `deleted_at` and keep the object.
    #[default]
    Soft,
    /// Remove the object.
    Hard,
}

impl DeletePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "soft" => Some(DeletePolicy::Soft),
            "hard" => Some(DeletePolicy::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CitizenClaim {
    #[serde(rename = "elderlyID")]
    elderly_id: String,
}

/// Bring records written by older clients up to the current shape.
///
/// Older rows carry the coordinate as one `"lat,lng"` string under
/// `latlong`. It becomes `location` unless a `location` is already set.
pub fn normalize_legacy(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    if let Some(latlong) = obj.remove("latlong") {
        let has_location = obj.get("location").is_some_and(|l| !l.is_null());
        if !has_location {
            let point = latlong.as_str().and_then(GeoPoint::parse_composite);
            obj.insert(
                "location".to_string(),
                serde_json::to_value(point).unwrap_or(Value::Null),
            );
        }
    }
    value
}

fn decode(value: Value) -> Result<Elderly, StorageError> {
    Ok(serde_json::from_value(normalize_legacy(value))?)
}

async fn load_raw(store: &dyn ObjectStore, id: &str) -> Result<Option<Elderly>, StorageError> {
    load_optional::<Value>(store, &keys::elderly(id))
        .await?
        .map(decode)
        .transpose()
}

/// Claim `citizen_id` for `elderly_id`. A claim left behind by a record that
/// is gone or soft-deleted is taken over.
async fn claim_citizen_id(
    store: &dyn ObjectStore,
    citizen_id: &str,
    elderly_id: &str,
) -> Result<(), StorageError> {
    let key = keys::citizen_index(citizen_id);
    let claim = CitizenClaim {
        elderly_id: elderly_id.to_string(),
    };

    match create_state(store, &key, &claim).await {
        Ok(_) => return Ok(()),
        Err(StorageError::PreconditionFailed { .. }) => {}
        Err(e) => return Err(e),
    }

    let (existing, etag) = load_state::<CitizenClaim>(store, &key).await?;
    if existing.elderly_id == elderly_id {
        return Ok(());
    }
    let holder_active = load_raw(store, &existing.elderly_id)
        .await?
        .is_some_and(|e| !e.is_deleted());
    if holder_active {
        return Err(StorageError::Conflict(format!(
            "citizen id {citizen_id} is already registered to {}",
            existing.elderly_id
        )));
    }

    match save_state_if_match(store, &key, &claim, &etag).await {
        Ok(_) => Ok(()),
        Err(StorageError::PreconditionFailed { .. }) => Err(StorageError::Conflict(format!(
            "citizen id {citizen_id} was claimed concurrently"
        ))),
        Err(e) => Err(e),
    }
}

/// Drop the claim on `citizen_id` if it still points at `elderly_id`.
async fn release_citizen_id(
    store: &dyn ObjectStore,
    citizen_id: &str,
    elderly_id: &str,
) -> Result<(), StorageError> {
    let key = keys::citizen_index(citizen_id);
    if let Some(claim) = load_optional::<CitizenClaim>(store, &key).await?
        && claim.elderly_id == elderly_id
    {
        store.delete_object(&key).await?;
    }
    Ok(())
}

pub async fn create(
    store: &dyn ObjectStore,
    registered_by: Option<&str>,
    profile: ElderlyProfile,
) -> Result<Elderly, StorageError> {
    if let Some(citizen_id) = &profile.citizen_id
        && find_by_citizen_id(store, citizen_id).await?.is_some()
    {
        return Err(StorageError::Conflict(format!(
            "citizen id {citizen_id} is already registered"
        )));
    }

    let id = sequence::next_code(store, CodeKind::Elderly).await?;
    if let Some(citizen_id) = &profile.citizen_id {
        claim_citizen_id(store, citizen_id, &id).await?;
    }

    let now = Timestamp::now();
    let elderly = Elderly {
        id,
        registered_by: registered_by.map(str::to_string),
        profile,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    save_state(store, &keys::elderly(&elderly.id), &elderly).await?;

    info!(elderly_id = %elderly.id, "elderly registered");
    Ok(elderly)
}

/// An active record. Soft-deleted records are reported as not found.
pub async fn get(store: &dyn ObjectStore, id: &str) -> Result<Elderly, StorageError> {
    load_raw(store, id)
        .await?
        .filter(|e| !e.is_deleted())
        .ok_or_else(|| StorageError::record_not_found(KIND, id))
}

/// Replace every mutable field. Last write wins.
pub async fn update(
    store: &dyn ObjectStore,
    id: &str,
    profile: ElderlyProfile,
) -> Result<Elderly, StorageError> {
    let mut elderly = get(store, id).await?;
    let previous_citizen_id = elderly.profile.citizen_id.clone();

    if profile.citizen_id != previous_citizen_id
        && let Some(citizen_id) = &profile.citizen_id
    {
        claim_citizen_id(store, citizen_id, id).await?;
    }

    elderly.profile = profile;
    elderly.updated_at = Timestamp::now();
    save_state(store, &keys::elderly(id), &elderly).await?;

    if let Some(old) = previous_citizen_id
        && elderly.profile.citizen_id.as_deref() != Some(old.as_str())
    {
        release_citizen_id(store, &old, id).await?;
    }

    info!(elderly_id = %id, "elderly updated");
    Ok(elderly)
}

/// Delete a record. Soft-deleting an already soft-deleted record is a no-op.
pub async fn delete(store: &dyn ObjectStore, id: &str, policy: DeletePolicy) -> Result<(), StorageError> {
    let Some(mut elderly) = load_raw(store, id).await? else {
        return Err(StorageError::record_not_found(KIND, id));
    };

    match policy {
        DeletePolicy::Soft => {
            if elderly.is_deleted() {
                return Ok(());
            }
            let now = Timestamp::now();
            elderly.deleted_at = Some(now);
            elderly.updated_at = now;
            save_state(store, &keys::elderly(id), &elderly).await?;
        }
        DeletePolicy::Hard => {
            store.delete_object(&keys::elderly(id)).await?;
        }
    }

    if let Some(citizen_id) = &elderly.profile.citizen_id {
        release_citizen_id(store, citizen_id, id).await?;
    }

    info!(elderly_id = %id, ?policy, "elderly deleted");
    Ok(())
}

/// Every active record, ordered by the numeric part of the id.
pub async fn list_active(store: &dyn ObjectStore) -> Result<Vec<Elderly>, StorageError> {
    let mut records = load_all_values(store, keys::ELDERLY_PREFIX)
        .await?
        .into_iter()
        .map(decode)
        .collect::<Result<Vec<_>, _>>()?;
    records.retain(|e| !e.is_deleted());
    records.sort_by(|a, b| compare_codes(&a.id, &b.id));
    Ok(records)
}

pub async fn search(
    store: &dyn ObjectStore,
    keyword: &str,
    page: PageRequest,
) -> Result<Page<Elderly>, StorageError> {
    let mut records = list_active(store).await?;
    records.retain(|e| e.matches(keyword));
    Ok(page.paginate(records))
}

pub async fn find_by_citizen_id(
    store: &dyn ObjectStore,
    citizen_id: &str,
) -> Result<Option<Elderly>, StorageError> {
    let citizen_id = citizen_id.trim();
    if citizen_id.is_empty() {
        return Ok(None);
    }
    let Some(claim) = load_optional::<CitizenClaim>(store, &keys::citizen_index(citizen_id)).await? else {
        return Ok(None);
    };
    Ok(load_raw(store, &claim.elderly_id)
        .await?
        .filter(|e| !e.is_deleted() && e.profile.citizen_id.as_deref() == Some(citizen_id)))
}

/// First active record whose name equals `name`, ignoring case and
/// surrounding whitespace.
pub async fn find_by_name(store: &dyn ObjectStore, name: &str) -> Result<Option<Elderly>, StorageError> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return Ok(None);
    }
    Ok(list_active(store)
        .await?
        .into_iter()
        .find(|e| e.profile.name.to_lowercase() == wanted))
}

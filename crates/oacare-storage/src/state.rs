use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::store::ObjectStore;

const JSON: Option<&str> = Some("application/json");

/// Load a JSON object. Returns the deserialized value and its ETag.
pub async fn load_state<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    key: &str,
) -> Result<(T, String), StorageError> {
    let output = store.get_object(key).await?;
    let value: T = serde_json::from_slice(&output.body)?;
    Ok((value, output.etag.unwrap_or_default()))
}

/// Load a JSON object, mapping a missing key to `None`.
pub async fn load_optional<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match load_state(store, key).await {
        Ok((value, _)) => Ok(Some(value)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Save a JSON object unconditionally. Returns the new ETag.
pub async fn save_state<T: Serialize>(
    store: &dyn ObjectStore,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put_object(key, body, JSON).await
}

/// Save a JSON object with ETag optimistic locking.
pub async fn save_state_if_match<T: Serialize>(
    store: &dyn ObjectStore,
    key: &str,
    value: &T,
    expected_etag: &str,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put_object_if_match(key, body, JSON, expected_etag).await
}

/// Create a JSON object, failing with `PreconditionFailed` if the key exists.
pub async fn create_state<T: Serialize>(
    store: &dyn ObjectStore,
    key: &str,
    value: &T,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    store.put_object_if_absent(key, body, JSON).await
}

/// Raw JSON of every object under `prefix`. Objects deleted between the list
/// and the get are skipped.
pub async fn load_all_values(
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<Vec<serde_json::Value>, StorageError> {
    let keys = store.list_objects(prefix).await?;
    let mut values = Vec::with_capacity(keys.len());
    for key in keys {
        match load_state::<serde_json::Value>(store, &key).await {
            Ok((value, _)) => values.push(value),
            Err(StorageError::NotFound { .. }) => {
                tracing::debug!(key, "object vanished during scan");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(values)
}

/// Every object under `prefix`, deserialized.
pub async fn load_all<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<Vec<T>, StorageError> {
    load_all_values(store, prefix)
        .await?
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(StorageError::from))
        .collect()
}

use jiff::Timestamp;
use oacare_core::keys;
use oacare_core::models::health_info::{HealthInfo, HealthInfoInput};
use tracing::info;
use uuid::Uuid;

use crate::error::StorageError;
use crate::state::{load_all, load_optional, save_state};
use crate::store::ObjectStore;

const KIND: &str = "health info";

pub async fn create(store: &dyn ObjectStore, input: HealthInfoInput) -> Result<HealthInfo, StorageError> {
    let now = Timestamp::now();
    let article = HealthInfo {
        id: Uuid::new_v4(),
        title: input.title.trim().to_string(),
        content: input.content.trim().to_string(),
        created_at: now,
        updated_at: now,
    };
    save_state(store, &keys::health_info(article.id), &article).await?;
    info!(health_info_id = %article.id, "health info created");
    Ok(article)
}

/// Every article, newest first.
pub async fn list(store: &dyn ObjectStore) -> Result<Vec<HealthInfo>, StorageError> {
    let mut articles: Vec<HealthInfo> = load_all(store, keys::HEALTH_INFO_PREFIX).await?;
    articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(articles)
}

pub async fn get(store: &dyn ObjectStore, id: Uuid) -> Result<HealthInfo, StorageError> {
    load_optional(store, &keys::health_info(id))
        .await?
        .ok_or_else(|| StorageError::record_not_found(KIND, id.to_string()))
}

pub async fn update(store: &dyn ObjectStore, id: Uuid, input: HealthInfoInput) -> Result<HealthInfo, StorageError> {
    let mut article = get(store, id).await?;
    article.title = input.title.trim().to_string();
    article.content = input.content.trim().to_string();
    article.updated_at = Timestamp::now();
    save_state(store, &keys::health_info(id), &article).await?;
    info!(health_info_id = %id, "health info updated");
    Ok(article)
}

pub async fn delete(store: &dyn ObjectStore, id: Uuid) -> Result<(), StorageError> {
    get(store, id).await?;
    store.delete_object(&keys::health_info(id)).await?;
    info!(health_info_id = %id, "health info deleted");
    Ok(())
}

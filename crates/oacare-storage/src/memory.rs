use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::store::{GetObjectOutput, ObjectStore};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    etag: String,
    content_type: Option<String>,
}

/// An in-process [`ObjectStore`] for local development and tests.
///
/// Conditional writes behave like S3: ETags change on every write and the
/// precondition is checked under the same lock as the write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    objects: BTreeMap<String, StoredObject>,
    version: u64,
}

impl Inner {
    fn write(&mut self, key: &str, body: Vec<u8>, content_type: Option<&str>) -> String {
        self.version += 1;
        let etag = format!("\"{:016x}\"", self.version);
        self.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                etag: etag.clone(),
                content_type: content_type.map(str::to_string),
            },
        );
        etag
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, key: &str) -> Result<GetObjectOutput, StorageError> {
        let inner = self.inner.read().await;
        let object = inner.objects.get(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;
        Ok(GetObjectOutput {
            body: object.body.clone(),
            etag: Some(object.etag.clone()),
            content_type: object.content_type.clone(),
        })
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        Ok(self.inner.write().await.write(key, body, content_type))
    }

    async fn put_object_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        expected_etag: &str,
    ) -> Result<String, StorageError> {
        let mut inner = self.inner.write().await;
        let matches = inner
            .objects
            .get(key)
            .is_some_and(|object| object.etag == expected_etag);
        if !matches {
            return Err(StorageError::PreconditionFailed {
                key: key.to_string(),
            });
        }
        Ok(inner.write(key, body, content_type))
    }

    async fn put_object_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let mut inner = self.inner.write().await;
        if inner.objects.contains_key(key) {
            return Err(StorageError::PreconditionFailed {
                key: key.to_string(),
            });
        }
        Ok(inner.write(key, body, content_type))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.inner.write().await.objects.remove(key);
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

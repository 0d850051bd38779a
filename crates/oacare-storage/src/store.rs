use async_trait::async_trait;

use crate::error::StorageError;

/// Result of a GET operation, including the body and ETag.
#[derive(Debug, Clone)]
pub struct GetObjectOutput {
    pub body: Vec<u8>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
}

/// Flat key/value object storage with conditional writes.
///
/// Conditional writes are the only concurrency primitive: counters and
/// uniqueness claims are built on `put_object_if_match` and
/// `put_object_if_absent`, never on in-process locks.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, key: &str) -> Result<GetObjectOutput, StorageError>;

    /// Unconditional write. Returns the new ETag.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;

    /// Write only if the current ETag equals `expected_etag`, otherwise
    /// `StorageError::PreconditionFailed`.
    async fn put_object_if_match(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        expected_etag: &str,
    ) -> Result<String, StorageError>;

    /// Write only if no object exists at `key`, otherwise
    /// `StorageError::PreconditionFailed`.
    async fn put_object_if_absent(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;

    /// Deleting a missing key is not an error.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Keys under `prefix`, in lexicographic order.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

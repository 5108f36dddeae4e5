//! Storage trait definitions.

use async_trait::async_trait;

use crate::StorageResult;

/// Trait for key-value storage backends
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store a value
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value, reporting whether it existed
    async fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists
    async fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

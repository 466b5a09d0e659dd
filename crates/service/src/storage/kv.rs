use async_trait::async_trait;

use crate::errors::StoreError;

/// Trait abstraction for device-local key-value storage.
/// Implementations can be file-backed, in-memory, or a platform store.
/// Any operation may fail with `StoreError::Storage`; callers do not retry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

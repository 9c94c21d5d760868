//! Storage backend trait.

use async_trait::async_trait;

use crate::error::PersistError;

/// Backend trait for durable key-value storage.
///
/// Implementations handle raw byte storage/retrieval.
/// The [`ViewStateStore`](super::ViewStateStore) wraps this with key
/// namespacing and typed serialization.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Get raw bytes for a key.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;

    /// Set raw bytes for a key.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), PersistError>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), PersistError>;

    /// Get all keys matching a prefix.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PersistError>;
}

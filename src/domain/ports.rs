use crate::error::Result;
use async_trait::async_trait;

/// Backing storage for the journal: JSON-encoded values keyed by string.
///
/// Every call completes its write before returning; implementations keep no
/// cache in front of the underlying medium that could serve stale reads.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

pub type KeyValueStoreBox = Box<dyn KeyValueStore>;

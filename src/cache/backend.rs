//! Cache store contract
//!
//! The wire-level operations the cache layer needs from a remote key-value
//! service. Implementations report failures honestly; masking them is the
//! job of `ProductCache`.

use async_trait::async_trait;

use crate::error::BackendError;

/// GET / SET-with-expiry / DEL over a key-value cache store.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetches the bytes stored under `key`, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Stores `value` under `key`, replacing any previous value, expiring
    /// after `ttl_seconds`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), BackendError>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), BackendError>;

    /// Short name used in log records.
    fn name(&self) -> &'static str;
}

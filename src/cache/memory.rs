//! In-Memory Cache Store
//!
//! HashMap-backed key-value store with per-entry TTL, plus the async
//! `CacheBackend` wrapper that shares it behind a `tokio::sync::RwLock`.
//! Expired entries are dropped lazily on access and by the periodic sweep
//! in `tasks::cleanup`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheBackend, CacheEntry, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::BackendError;

// == Memory Store ==
/// Synchronous TTL store. No eviction besides expiry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a value under `key` for `ttl_seconds`.
    ///
    /// An existing value is replaced whole and its TTL reset.
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl_seconds: u64) -> Result<(), BackendError> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(BackendError::Rejected(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(BackendError::Rejected(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.entries.insert(key, CacheEntry::new(value, ttl_seconds));
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == TTL ==
    /// Remaining lifetime of a live entry in milliseconds.
    pub fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining_ms)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the number of entries held, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Memory Backend ==
/// `CacheBackend` over a shared `MemoryStore`.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryBackend {
    /// Creates a backend with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle on the underlying store, for the sweep task.
    pub fn store(&self) -> Arc<RwLock<MemoryStore>> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        // Write lock: an expired hit is removed on the spot
        let mut store = self.store.write().await;
        Ok(store.get(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), BackendError> {
        let mut store = self.store.write().await;
        store.set(key.to_string(), value, ttl_seconds)
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        let mut store = self.store.write().await;
        store.delete(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

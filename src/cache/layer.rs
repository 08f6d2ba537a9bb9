//! Product Cache Layer
//!
//! Fail-soft front end over a `CacheBackend`. Every operation has a total
//! contract: reads answer `Hit` or `Miss`, writes and deletes always return.
//! Backend errors, timeouts and undecodable snapshots are reported only
//! through `tracing` and the failure counter.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheCounters, CacheStats, KEY_PREFIX};
use crate::error::BackendError;
use crate::models::Product;

/// Outcome of a cache lookup.
///
/// A backend failure is indistinguishable from an absent key: both mean
/// "go to the store".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(Vec<u8>),
    Miss,
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            CacheLookup::Hit(bytes) => Some(bytes),
            CacheLookup::Miss => None,
        }
    }
}

/// Builds the cache key for a product id.
pub fn cache_key(id: &str) -> String {
    format!("{}{}", KEY_PREFIX, id)
}

/// Cache layer shared by all request handlers. Cheap to clone.
#[derive(Clone)]
pub struct ProductCache {
    backend: Arc<dyn CacheBackend>,
    ttl_seconds: u64,
    timeout: Duration,
    counters: Arc<CacheCounters>,
}

impl ProductCache {
    /// Wraps `backend`. `ttl_seconds` applies to product snapshots and
    /// `timeout` bounds every backend call.
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_seconds: u64, timeout: Duration) -> Self {
        Self {
            backend,
            ttl_seconds: ttl_seconds.max(1),
            timeout,
            counters: Arc::new(CacheCounters::new()),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    // == Raw Operations ==

    /// Looks up `key`. Never fails.
    pub async fn get(&self, key: &str) -> CacheLookup {
        match self.bounded(self.backend.get(key)).await {
            Ok(Some(bytes)) => {
                self.counters.record_hit();
                debug!(key, "Cache hit");
                CacheLookup::Hit(bytes)
            }
            Ok(None) => {
                self.counters.record_miss();
                debug!(key, "Cache miss");
                CacheLookup::Miss
            }
            Err(err) => {
                self.counters.record_miss();
                self.counters.record_failure();
                warn!(
                    key,
                    backend = self.backend.name(),
                    error = %err,
                    "Cache get failed; falling back to store"
                );
                CacheLookup::Miss
            }
        }
    }

    /// Stores `value` under `key` for `ttl_seconds`. Failures are logged and dropped.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) {
        if let Err(err) = self.bounded(self.backend.set(key, value, ttl_seconds)).await {
            self.counters.record_failure();
            warn!(
                key,
                backend = self.backend.name(),
                error = %err,
                "Cache set failed; continuing without cache"
            );
        }
    }

    /// Removes `key`. Absent keys and failures both count as done.
    pub async fn delete(&self, key: &str) {
        if let Err(err) = self.bounded(self.backend.delete(key)).await {
            self.counters.record_failure();
            warn!(
                key,
                backend = self.backend.name(),
                error = %err,
                "Cache delete failed; continuing"
            );
        }
    }

    // == Product Operations ==

    /// Cached snapshot of product `id`, if any. A snapshot that no longer
    /// decodes is treated as a miss.
    pub async fn get_product(&self, id: &str) -> Option<Product> {
        let key = cache_key(id);
        let bytes = self.get(&key).await.into_bytes()?;
        match Product::from_snapshot(&bytes) {
            Ok(product) => Some(product),
            Err(err) => {
                self.counters.record_failure();
                warn!(key = %key, error = %err, "Discarding undecodable cache snapshot");
                None
            }
        }
    }

    /// Caches a snapshot of `product` with the configured TTL.
    pub async fn put_product(&self, product: &Product) {
        match product.to_snapshot() {
            Ok(bytes) => self.set(&cache_key(&product.id), bytes, self.ttl_seconds).await,
            Err(err) => {
                self.counters.record_failure();
                warn!(id = %product.id, error = %err, "Failed to encode product for cache");
            }
        }
    }

    /// Drops any cached snapshot of product `id`.
    pub async fn invalidate_product(&self, id: &str) {
        self.delete(&cache_key(id)).await;
    }

    async fn bounded<T>(
        &self,
        operation: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.timeout)),
        }
    }
}

impl std::fmt::Debug for ProductCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCache")
            .field("backend", &self.backend.name())
            .field("ttl_seconds", &self.ttl_seconds)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;

    use super::*;

    /// Backend whose every operation fails, like a Redis that is down.
    pub struct FailingBackend;

    #[async_trait]
    impl CacheBackend for FailingBackend {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, BackendError> {
            Err(BackendError::Unavailable("cache down".to_string()))
        }

        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: u64) -> Result<(), BackendError> {
            Err(BackendError::Unavailable("cache down".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<(), BackendError> {
            Err(BackendError::Unavailable("cache down".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    /// Backend that never answers within any reasonable bound.
    pub struct StalledBackend;

    #[async_trait]
    impl CacheBackend for StalledBackend {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, BackendError> {
            std::future::pending().await
        }

        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: u64) -> Result<(), BackendError> {
            std::future::pending().await
        }

        async fn delete(&self, _key: &str) -> Result<(), BackendError> {
            std::future::pending().await
        }

        fn name(&self) -> &'static str {
            "stalled"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{FailingBackend, StalledBackend};
    use super::*;
    use crate::cache::MemoryBackend;

    fn memory_cache() -> (ProductCache, MemoryBackend) {
        let backend = MemoryBackend::new();
        let cache = ProductCache::new(Arc::new(backend.clone()), 60, Duration::from_millis(500));
        (cache, backend)
    }

    fn widget() -> Product {
        Product {
            id: "abc".to_string(),
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: 9.99,
            stock_quantity: 10,
        }
    }

    #[test]
    fn test_cache_key_convention() {
        assert_eq!(cache_key("abc"), "record:abc");
    }

    #[tokio::test]
    async fn test_get_miss_then_hit() {
        let (cache, _) = memory_cache();

        assert_eq!(cache.get("record:abc").await, CacheLookup::Miss);
        cache.set("record:abc", b"snapshot".to_vec(), 60).await;
        assert_eq!(
            cache.get("record:abc").await,
            CacheLookup::Hit(b"snapshot".to_vec())
        );

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.failures, 0);
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_silent() {
        let (cache, _) = memory_cache();

        cache.delete("record:missing").await;
        cache.delete("record:missing").await;
        assert_eq!(cache.stats().failures, 0);
    }

    #[tokio::test]
    async fn test_product_snapshot_roundtrip() {
        let (cache, backend) = memory_cache();
        let product = widget();

        cache.put_product(&product).await;
        assert!(backend.get("record:abc").await.unwrap().is_some());
        assert_eq!(cache.get_product("abc").await, Some(product));

        cache.invalidate_product("abc").await;
        assert_eq!(cache.get_product("abc").await, None);
    }

    #[tokio::test]
    async fn test_put_product_uses_configured_ttl() {
        let (cache, backend) = memory_cache();

        cache.put_product(&widget()).await;
        let remaining = backend
            .store()
            .read()
            .await
            .ttl_remaining_ms("record:abc")
            .unwrap();
        assert!(remaining > 55_000 && remaining <= 60_000);
    }

    #[tokio::test]
    async fn test_undecodable_snapshot_is_a_miss() {
        let (cache, backend) = memory_cache();

        backend.set("record:abc", b"garbage".to_vec(), 60).await.unwrap();
        assert_eq!(cache.get_product("abc").await, None);
        assert_eq!(cache.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_failing_backend_is_masked() {
        let cache = ProductCache::new(Arc::new(FailingBackend), 60, Duration::from_millis(500));

        assert_eq!(cache.get("record:abc").await, CacheLookup::Miss);
        cache.set("record:abc", b"snapshot".to_vec(), 60).await;
        cache.delete("record:abc").await;
        assert_eq!(cache.get_product("abc").await, None);
        cache.put_product(&widget()).await;
        cache.invalidate_product("abc").await;

        assert_eq!(cache.stats().failures, 6);
    }

    #[tokio::test]
    async fn test_stalled_backend_times_out() {
        let timeout = Duration::from_millis(50);
        let cache = ProductCache::new(Arc::new(StalledBackend), 60, timeout);

        let started = std::time::Instant::now();
        assert_eq!(cache.get("record:abc").await, CacheLookup::Miss);
        cache.set("record:abc", b"snapshot".to_vec(), 60).await;
        cache.delete("record:abc").await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(cache.stats().failures, 3);
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_masked() {
        let backend = crate::cache::RedisBackend::new("redis://127.0.0.1:1/").unwrap();
        let cache = ProductCache::new(Arc::new(backend), 60, Duration::from_millis(500));

        assert_eq!(cache.get_product("abc").await, None);
        cache.put_product(&widget()).await;
        cache.invalidate_product("abc").await;
        assert_eq!(cache.stats().failures, 3);
    }

    #[tokio::test]
    async fn test_ttl_expiry_through_layer() {
        let (cache, _) = memory_cache();

        cache.set("record:abc", b"snapshot".to_vec(), 1).await;
        assert!(cache.get("record:abc").await.is_hit());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(cache.get("record:abc").await, CacheLookup::Miss);
    }
}

//! Cache Module
//!
//! Fail-soft cache-aside layer for product snapshots, and the cache stores
//! it can sit on: Redis in production, an in-process TTL store otherwise.

mod backend;
mod entry;
mod layer;
mod memory;
mod redis_backend;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use layer::{cache_key, CacheLookup, ProductCache};
pub use memory::{MemoryBackend, MemoryStore};
pub use redis_backend::RedisBackend;
pub use stats::{CacheCounters, CacheStats};

#[cfg(test)]
pub(crate) use layer::test_support as layer_test_support;

// == Public Constants ==
/// Prefix of every product cache key (`record:{id}`)
pub const KEY_PREFIX: &str = "record:";

/// Maximum allowed key length in bytes (in-memory store)
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes (in-memory store)
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

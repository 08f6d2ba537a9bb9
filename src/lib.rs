//! Product Cache - A product record API with a read-through cache
//!
//! Serves product records from a SQLite store, fronted by a fail-soft
//! cache-aside layer over Redis (or an in-process TTL store).

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheBackend, CacheLookup, MemoryBackend, ProductCache, RedisBackend};
pub use config::Config;
pub use service::ProductService;
pub use store::{seed_if_empty, ProductRepository, SqliteProductRepository};
pub use tasks::spawn_cleanup_task;

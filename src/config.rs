//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which cache store sits behind the cache layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackendKind {
    /// Remote Redis server
    #[default]
    Redis,
    /// In-process TTL store
    Memory,
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" | "in-memory" | "in_memory" => Ok(Self::Memory),
            _ => Err(format!("Unknown cache backend: {value}")),
        }
    }
}

impl fmt::Display for CacheBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis => write!(f, "redis"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub api_port: u16,
    /// Redis host name
    pub redis_host: String,
    /// Redis port
    pub redis_port: u16,
    /// TTL in seconds applied to every cached product
    pub cache_ttl_seconds: u64,
    /// Upper bound for a single cache operation, in milliseconds
    pub cache_timeout_ms: u64,
    /// Cache store implementation
    pub cache_backend: CacheBackendKind,
    /// Sweep interval in seconds for the in-memory cache store
    pub cleanup_interval: u64,
    /// SQLite connection string for the record store
    pub database_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_PORT` - HTTP server port (default: 8080)
    /// - `REDIS_HOST` - Redis host (default: redis)
    /// - `REDIS_PORT` - Redis port (default: 6379)
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds, minimum 1 (default: 3600)
    /// - `CACHE_TIMEOUT_MS` - Per-operation cache timeout, minimum 1 (default: 1000)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `CLEANUP_INTERVAL` - Memory store sweep frequency in seconds (default: 1)
    /// - `DATABASE_URL` - Record store location (default: sqlite://products.db)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any name -> value lookup. Unset or unparsable
    /// values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_port: parse(lookup("API_PORT")).unwrap_or(defaults.api_port),
            redis_host: lookup("REDIS_HOST").unwrap_or(defaults.redis_host),
            redis_port: parse(lookup("REDIS_PORT")).unwrap_or(defaults.redis_port),
            cache_ttl_seconds: parse(lookup("CACHE_TTL_SECONDS"))
                .unwrap_or(defaults.cache_ttl_seconds)
                .max(1),
            cache_timeout_ms: parse(lookup("CACHE_TIMEOUT_MS"))
                .unwrap_or(defaults.cache_timeout_ms)
                .max(1),
            cache_backend: parse(lookup("CACHE_BACKEND")).unwrap_or(defaults.cache_backend),
            cleanup_interval: parse(lookup("CLEANUP_INTERVAL"))
                .unwrap_or(defaults.cleanup_interval)
                .max(1),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
        }
    }

    /// Connection URL for the Redis cache store.
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.redis_host, self.redis_port)
    }

    /// Per-operation cache timeout as a Duration.
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_port: 8080,
            redis_host: "redis".to_string(),
            redis_port: 6379,
            cache_ttl_seconds: 3600,
            cache_timeout_ms: 1000,
            cache_backend: CacheBackendKind::Redis,
            cleanup_interval: 1,
            database_url: "sqlite://products.db".to_string(),
        }
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

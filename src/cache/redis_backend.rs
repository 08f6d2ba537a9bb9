//! Redis Cache Store
//!
//! `CacheBackend` over a Redis server. The multiplexed connection is opened
//! on first use and shared by every request; a connection-level failure drops
//! it so the next operation dials again. Nothing here retries.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::CacheBackend;
use crate::error::BackendError;

/// Redis-backed cache store.
pub struct RedisBackend {
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
}

impl RedisBackend {
    /// Creates a backend for `url` (e.g. `redis://redis:6379/`).
    ///
    /// Does not connect; an unreachable server only shows up as failed
    /// operations later.
    pub fn new(url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            client: redis::Client::open(url)?,
            connection: Mutex::new(None),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, BackendError> {
        let mut slot = self.connection.lock().await;
        if let Some(connection) = slot.as_ref() {
            return Ok(connection.clone());
        }

        debug!("Opening Redis connection");
        let connection = self.client.get_multiplexed_async_connection().await?;
        *slot = Some(connection.clone());
        Ok(connection)
    }

    /// Drops the shared connection after a connection-level error.
    async fn discard_on(&self, err: &redis::RedisError) {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            *self.connection.lock().await = None;
        }
    }
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend")
            .field("connection_info", self.client.get_connection_info())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let mut connection = self.connection().await?;
        let result: redis::RedisResult<Option<Vec<u8>>> = connection.get(key).await;
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                self.discard_on(&err).await;
                Err(err.into())
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), BackendError> {
        let mut connection = self.connection().await?;
        let result: redis::RedisResult<()> = connection.set_ex(key, value, ttl_seconds).await;
        if let Err(err) = result {
            self.discard_on(&err).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        let mut connection = self.connection().await?;
        // DEL on a missing key answers 0, which is still success
        let result: redis::RedisResult<i64> = connection.del(key).await;
        if let Err(err) = result {
            self.discard_on(&err).await;
            return Err(err.into());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

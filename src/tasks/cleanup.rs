//! TTL Cleanup Task
//!
//! Background task that periodically removes expired entries from the
//! in-memory cache store. Redis expires keys on its own and needs no sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task loops forever, sleeping `cleanup_interval_secs` between runs and
/// taking the store's write lock only for the sweep itself.
///
/// Returns the task's JoinHandle so shutdown can abort it.
///
/// # Example
/// ```ignore
/// let backend = MemoryBackend::new();
/// let cleanup_handle = spawn_cleanup_task(backend.store(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    store: Arc<RwLock<MemoryStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.write().await;
                guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

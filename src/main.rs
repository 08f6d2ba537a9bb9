//! Product Cache - A product record API with a read-through cache
//!
//! Serves product records from SQLite through a fail-soft cache-aside layer.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_cache::api::create_router;
use product_cache::config::CacheBackendKind;
use product_cache::{
    seed_if_empty, spawn_cleanup_task, AppState, CacheBackend, Config, MemoryBackend,
    ProductCache, RedisBackend, SqliteProductRepository,
};

/// Main entry point for the product API server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the record store and create the schema
/// 4. Seed sample products into an empty store
/// 5. Build the cache backend (and its sweep task for the memory store)
/// 6. Create Axum router with all endpoints
/// 7. Serve until SIGINT/SIGTERM, then shut down gracefully
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Product Cache API Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_backend={}, cache_ttl={}s, cache_timeout={}ms",
        config.api_port, config.cache_backend, config.cache_ttl_seconds, config.cache_timeout_ms
    );

    let store = SqliteProductRepository::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open record store at {}", config.database_url))?;

    // One-time seeding, before any request is served
    seed_if_empty(&store)
        .await
        .context("failed to seed record store")?;

    let (backend, cleanup_handle) = build_cache_backend(&config)?;
    let cache = ProductCache::new(backend, config.cache_ttl_seconds, config.cache_timeout());
    info!("Cache layer initialized: {:?}", cache);

    let state = AppState::from_parts(Arc::new(store.clone()), cache.clone());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    let stats = cache.stats();
    info!(
        "Cache stats at shutdown: hits={}, misses={}, failures={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.failures,
        stats.hit_rate()
    );

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured cache store. The memory store also gets its
/// periodic sweep task.
fn build_cache_backend(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheBackend>, Option<JoinHandle<()>>)> {
    match config.cache_backend {
        CacheBackendKind::Redis => {
            let backend = RedisBackend::new(&config.redis_url())
                .with_context(|| format!("invalid Redis address {}", config.redis_url()))?;
            info!("Using Redis cache at {}", config.redis_url());
            Ok((Arc::new(backend), None))
        }
        CacheBackendKind::Memory => {
            let backend = MemoryBackend::new();
            let handle = spawn_cleanup_task(backend.store(), config.cleanup_interval);
            info!("Using in-memory cache store");
            Ok((Arc::new(backend), Some(handle)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}

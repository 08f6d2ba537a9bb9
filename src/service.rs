//! Product Service
//!
//! Cache-aside orchestration over the record store.
//!
//! Reads consult the cache first and repopulate it from the store on a miss.
//! Writes go to the store first and only then invalidate the cached snapshot,
//! so a committed write is never followed by a read of the old snapshot
//! (unless the invalidation itself failed, which TTL bounds).
//!
//! Concurrent requests for the same key are not serialized. A read that
//! misses, loads from the store, and is overtaken by a write before it
//! repopulates the cache can leave the pre-write snapshot cached until TTL
//! expiry.

use std::sync::Arc;

use tracing::debug;

use crate::cache::ProductCache;
use crate::error::{Result, ServiceError};
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::store::ProductRepository;

/// Stateless request-level protocol; clones share the store and cache handles.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductRepository>,
    cache: ProductCache,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductRepository>, cache: ProductCache) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &ProductCache {
        &self.cache
    }

    // == Read ==
    /// Returns product `id`, from cache when possible.
    pub async fn get(&self, id: &str) -> Result<Product> {
        if let Some(product) = self.cache.get_product(id).await {
            return Ok(product);
        }

        // No negative caching: a missing record leaves the cache untouched
        let product = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        self.cache.put_product(&product).await;
        debug!(id, "Loaded product from store and cached it");
        Ok(product)
    }

    // == Create ==
    /// Validates and stores a new product.
    pub async fn create(&self, product: NewProduct) -> Result<Product> {
        if let Some(msg) = product.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }

        let created = self.store.create(&product).await?;
        // Nothing can be cached under a fresh id; the delete is a no-op
        self.cache.invalidate_product(&created.id).await;
        Ok(created)
    }

    // == Update ==
    /// Applies a partial update to product `id`.
    pub async fn update(&self, id: &str, update: ProductUpdate) -> Result<Product> {
        if let Some(msg) = update.validate() {
            return Err(ServiceError::InvalidRequest(msg));
        }

        let updated = self
            .store
            .update(id, &update)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        self.cache.invalidate_product(id).await;
        Ok(updated)
    }

    // == Delete ==
    /// Deletes product `id`.
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(id.to_string()));
        }

        self.cache.invalidate_product(id).await;
        Ok(())
    }
}

//! Record Store Module
//!
//! The durable source of truth for products. Every operation either returns
//! the current record (or "not found") or a `StoreError`; the store is never
//! bypassed, so its errors reach the caller unchanged.

mod seed;
mod sqlite;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{NewProduct, Product, ProductUpdate};

pub use seed::{sample_products, seed_if_empty};
pub use sqlite::SqliteProductRepository;

/// Key-addressable product persistence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persists a new product under a freshly generated id.
    async fn create(&self, product: &NewProduct) -> Result<Product, StoreError>;

    /// Reads a product, `None` if no record has this id.
    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// Applies the fields present in `update`; `None` if no record has this id.
    async fn update(&self, id: &str, update: &ProductUpdate) -> Result<Option<Product>, StoreError>;

    /// Deletes a product. Returns whether a record was found.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Number of stored products.
    async fn count(&self) -> Result<u64, StoreError>;

    /// True when the store holds no products.
    async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.count().await? == 0)
    }
}

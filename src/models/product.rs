//! Product record

use serde::{Deserialize, Serialize};

/// A product as held by the record store.
///
/// The cache only ever stores a JSON snapshot of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Store-assigned identifier (UUID v4)
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i64,
}

impl Product {
    /// Serializes the product into the byte snapshot kept in the cache.
    pub fn to_snapshot(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decodes a cached snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

//! SQLite product repository
//!
//! ```sql
//! CREATE TABLE products (
//!     id TEXT PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     description TEXT NOT NULL,
//!     price REAL NOT NULL,
//!     stock_quantity INTEGER NOT NULL
//! );
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::store::ProductRepository;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    price REAL NOT NULL,
    stock_quantity INTEGER NOT NULL
)
"#;

/// `ProductRepository` backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    /// Wraps an existing pool. The schema must already exist; see `migrate`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens `url` (creating the database file if needed) and ensures the
    /// schema exists.
    ///
    /// In-memory databases get a single long-lived connection, since each
    /// SQLite connection would otherwise see its own empty database.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let repository = Self::new(pool);
        repository.migrate().await?;
        info!(url, "Record store ready");
        Ok(repository)
    }

    /// Creates the products table if missing.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn create(&self, product: &NewProduct) -> Result<Product, StoreError> {
        let created = sqlx::query_as::<_, Product>(
            "INSERT INTO products (id, name, description, price, stock_quantity) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             RETURNING id, name, description, price, stock_quantity",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock_quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, stock_quantity FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update(&self, id: &str, update: &ProductUpdate) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET \
                 name = COALESCE(?1, name), \
                 description = COALESCE(?2, description), \
                 price = COALESCE(?3, price), \
                 stock_quantity = COALESCE(?4, stock_quantity) \
             WHERE id = ?5 \
             RETURNING id, name, description, price, stock_quantity",
        )
        .bind(update.name.as_deref())
        .bind(update.description.as_deref())
        .bind(update.price)
        .bind(update.stock_quantity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}

//! Startup seeding
//!
//! One-time initialization run before the server starts accepting requests:
//! sample products are inserted only into an empty store.

use tracing::info;

use crate::error::StoreError;
use crate::models::NewProduct;
use crate::store::ProductRepository;

/// The products inserted into an empty store.
pub fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Wireless Mouse".to_string(),
            description: "Ergonomic 2.4GHz wireless mouse".to_string(),
            price: 24.99,
            stock_quantity: 120,
        },
        NewProduct {
            name: "Mechanical Keyboard".to_string(),
            description: "RGB backlit mechanical keyboard".to_string(),
            price: 79.50,
            stock_quantity: 75,
        },
        NewProduct {
            name: "USB-C Hub".to_string(),
            description: "7-in-1 USB-C hub for laptops".to_string(),
            price: 39.00,
            stock_quantity: 200,
        },
    ]
}

/// Seeds `repository` with the sample products if it holds none.
///
/// Returns how many products were inserted; 0 when data already exists.
pub async fn seed_if_empty(repository: &dyn ProductRepository) -> Result<usize, StoreError> {
    if !repository.is_empty().await? {
        info!("Record store already populated; skipping seed");
        return Ok(0);
    }

    let samples = sample_products();
    for product in &samples {
        repository.create(product).await?;
    }

    info!("Seeded record store with {} sample products", samples.len());
    Ok(samples.len())
}

//! Property-Based Tests for the Cache Layer
//!
//! Uses proptest to check the fail-soft contract, idempotent invalidation and
//! read-after-write freshness over generated keys, values and write sequences.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tokio::runtime::Runtime;

use crate::cache::layer_test_support::FailingBackend;
use crate::cache::{CacheLookup, MemoryBackend, ProductCache};
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::service::ProductService;
use crate::store::SqliteProductRepository;

// == Test Configuration ==
const TEST_TTL: u64 = 300;
const TEST_TIMEOUT: Duration = Duration::from_millis(500);

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// == Strategies ==
/// Generates cache keys in the `record:{id}` shape
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9-]{1,40}".prop_map(|id| format!("record:{}", id))
}

/// Generates snapshot payloads
fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..256)
}

/// Generates prices in whole cents
fn price_strategy() -> impl Strategy<Value = f64> {
    (0u32..1_000_000).prop_map(|cents| f64::from(cents) / 100.0)
}

fn product_strategy() -> impl Strategy<Value = Product> {
    (
        "[a-z0-9-]{1,36}",
        "[a-zA-Z ]{1,32}",
        "[a-zA-Z ]{1,64}",
        price_strategy(),
        0i64..1_000_000,
    )
        .prop_map(|(id, name, description, price, stock_quantity)| Product {
            id,
            name,
            description,
            price,
            stock_quantity,
        })
}

/// A single write applied to one product
#[derive(Debug, Clone)]
enum WriteOp {
    Price(f64),
    Stock(i64),
    Name(String),
}

fn write_op_strategy() -> impl Strategy<Value = WriteOp> {
    prop_oneof![
        price_strategy().prop_map(WriteOp::Price),
        (0i64..10_000).prop_map(WriteOp::Stock),
        "[a-zA-Z]{1,20}".prop_map(WriteOp::Name),
    ]
}

impl WriteOp {
    fn into_update(self) -> ProductUpdate {
        match self {
            WriteOp::Price(price) => ProductUpdate {
                price: Some(price),
                ..ProductUpdate::default()
            },
            WriteOp::Stock(stock_quantity) => ProductUpdate {
                stock_quantity: Some(stock_quantity),
                ..ProductUpdate::default()
            },
            WriteOp::Name(name) => ProductUpdate {
                name: Some(name),
                ..ProductUpdate::default()
            },
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // *For any* key and value, with the cache store unreachable, every cache
    // operation completes with its miss / no-op outcome and nothing escapes.
    #[test]
    fn prop_failing_backend_is_total(key in key_strategy(), value in value_strategy()) {
        let rt = runtime();
        rt.block_on(async {
            let cache = ProductCache::new(Arc::new(FailingBackend), TEST_TTL, TEST_TIMEOUT);

            prop_assert_eq!(cache.get(&key).await, CacheLookup::Miss);
            cache.set(&key, value, TEST_TTL).await;
            cache.delete(&key).await;
            prop_assert_eq!(cache.get(&key).await, CacheLookup::Miss);
            prop_assert_eq!(cache.stats().failures, 4);
            Ok(())
        })?;
    }

    // *For any* key, deleting it when absent succeeds silently, any number of times.
    #[test]
    fn prop_invalidation_is_idempotent(key in key_strategy(), repeats in 1usize..5) {
        let rt = runtime();
        rt.block_on(async {
            let cache = ProductCache::new(Arc::new(MemoryBackend::new()), TEST_TTL, TEST_TIMEOUT);

            for _ in 0..repeats {
                cache.delete(&key).await;
            }
            prop_assert_eq!(cache.get(&key).await, CacheLookup::Miss);
            prop_assert_eq!(cache.stats().failures, 0);
            Ok(())
        })?;
    }

    // *For any* key, a present entry is exactly the last value written.
    #[test]
    fn prop_last_write_wins(
        key in key_strategy(),
        values in prop::collection::vec(value_strategy(), 1..5)
    ) {
        let rt = runtime();
        rt.block_on(async {
            let cache = ProductCache::new(Arc::new(MemoryBackend::new()), TEST_TTL, TEST_TIMEOUT);

            for value in &values {
                cache.set(&key, value.clone(), TEST_TTL).await;
            }
            let last = values.last().cloned();
            prop_assert_eq!(cache.get(&key).await.into_bytes(), last);
            Ok(())
        })?;
    }

    // *For any* product, the cached snapshot decodes to the same product.
    #[test]
    fn prop_product_snapshot_is_faithful(product in product_strategy()) {
        let rt = runtime();
        rt.block_on(async {
            let cache = ProductCache::new(Arc::new(MemoryBackend::new()), TEST_TTL, TEST_TIMEOUT);

            cache.put_product(&product).await;
            prop_assert_eq!(cache.get_product(&product.id).await, Some(product.clone()));
            Ok(())
        })?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // *For any* sequence of writes, a read issued after each write's
    // acknowledgement returns what the write committed, never the older
    // cached snapshot.
    #[test]
    fn prop_read_after_write_is_fresh(ops in prop::collection::vec(write_op_strategy(), 1..8)) {
        let rt = runtime();
        rt.block_on(async {
            let store = SqliteProductRepository::connect("sqlite::memory:").await.unwrap();
            let cache = ProductCache::new(Arc::new(MemoryBackend::new()), TEST_TTL, TEST_TIMEOUT);
            let service = ProductService::new(Arc::new(store), cache);

            let created = service
                .create(NewProduct {
                    name: "Widget".to_string(),
                    description: "A widget".to_string(),
                    price: 9.99,
                    stock_quantity: 10,
                })
                .await
                .unwrap();

            // Warm the cache so every write has a snapshot to invalidate
            service.get(&created.id).await.unwrap();

            for op in ops {
                let committed = service.update(&created.id, op.into_update()).await.unwrap();
                let read = service.get(&created.id).await.unwrap();
                prop_assert_eq!(&read, &committed);
                // Repopulated snapshot is the committed one too
                let cached = service.get(&created.id).await.unwrap();
                prop_assert_eq!(&cached, &committed);
            }

            service.delete(&created.id).await.unwrap();
            prop_assert!(service.get(&created.id).await.is_err());
            Ok(())
        })?;
    }
}

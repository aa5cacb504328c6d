use crate::{Error, Filter, Product, Result};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Products sampled for the refined memory estimate
const STATS_SAMPLE: usize = 50;
/// Flat per-product size used by the simple memory estimate
const ESTIMATED_PRODUCT_KB: f64 = 10.0;

/// Default and maximum size of a category listing
pub const DEFAULT_CATEGORY_LIMIT: usize = 500;
pub const MAX_CATEGORY_LIMIT: usize = 1000;

/// An immutable, frozen view of the catalog
///
/// Products keep their load order. Ids are unique: the first occurrence of
/// a duplicate id wins.
#[derive(Debug, Default)]
pub struct ProductSnapshot {
    generation: u64,
    products: Vec<Product>,
    index: AHashMap<String, usize>,
}

impl ProductSnapshot {
    pub fn new(generation: u64, products: Vec<Product>) -> Self {
        let mut index = AHashMap::with_capacity(products.len());
        let mut kept = Vec::with_capacity(products.len());

        for product in products {
            if index.contains_key(&product.product_id) {
                tracing::warn!(
                    "Duplicate product id {}, keeping first occurrence",
                    product.product_id
                );
                continue;
            }
            index.insert(product.product_id.clone(), kept.len());
            kept.push(product);
        }

        Self {
            generation,
            products: kept,
            index,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.index.get(product_id).map(|&idx| &self.products[idx])
    }

    /// Load-order position of a product
    pub fn position(&self, product_id: &str) -> Option<usize> {
        self.index.get(product_id).copied()
    }

    /// Products matching a filter, in snapshot order
    pub fn filter(&self, filter: &dyn Filter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Products whose `big_category` contains `keyword`, case-insensitively
    pub fn by_big_category(&self, keyword: &str, limit: usize) -> Result<Vec<&Product>> {
        if limit == 0 || limit > MAX_CATEGORY_LIMIT {
            return Err(Error::InvalidLimit {
                value: limit,
                min: 1,
                max: MAX_CATEGORY_LIMIT,
            });
        }
        let filter = crate::ProductFilter::big_category_contains(keyword);
        Ok(self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .take(limit)
            .collect())
    }

    pub fn stats(&self) -> CacheStats {
        let count = self.products.len();
        let simple = round2(count as f64 * ESTIMATED_PRODUCT_KB / 1024.0);

        let sample = &self.products[..count.min(STATS_SAMPLE)];
        let refined = if sample.is_empty() {
            None
        } else {
            serde_json::to_vec(sample).ok().map(|bytes| {
                let per_item_kb = bytes.len() as f64 / sample.len() as f64 / 1024.0;
                round2(per_item_kb * count as f64 / 1024.0)
            })
        };

        CacheStats {
            cached_products: count,
            estimated_memory_mb_simple: simple,
            estimated_memory_mb_refined: refined,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Size report for the loaded catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub cached_products: usize,
    pub estimated_memory_mb_simple: f64,
    /// Extrapolated from the serialized size of a sample; absent when empty
    pub estimated_memory_mb_refined: Option<f64>,
}

/// Publish-once, read-many handle on the current snapshot
///
/// Readers clone the `Arc` and release the lock immediately, so a publish
/// never blocks behind a long-running query and never exposes a partial
/// snapshot.
pub struct ProductStore {
    current: RwLock<Arc<ProductSnapshot>>,
    next_generation: AtomicU64,
}

impl ProductStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(ProductSnapshot::default())),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Freeze `products` into a new snapshot and make it current
    pub fn publish(&self, products: Vec<Product>) -> Arc<ProductSnapshot> {
        let generation = self.next_generation.fetch_add(1, Ordering::AcqRel);
        let snapshot = Arc::new(ProductSnapshot::new(generation, products));
        *self.current.write() = snapshot.clone();
        tracing::info!(
            "Published catalog generation {} with {} products",
            generation,
            snapshot.len()
        );
        snapshot
    }

    pub fn snapshot(&self) -> Arc<ProductSnapshot> {
        self.current.read().clone()
    }

    pub fn count(&self) -> usize {
        self.current.read().len()
    }
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Catalog facade
//!
//! Owns the product store and both engines. Every query reads the current
//! snapshot once, so a concurrent [`Catalog::publish`] never changes the data
//! underneath a running query.

use catalogx_core::{
    loader, BrandTable, CacheStats, Error, Product, ProductSnapshot, ProductStore,
    RecommendationEntry, Result,
};
use catalogx_search::{SearchConfig, SearchEngine};
use catalogx_similarity::{RecommendConfig, Recommender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

/// Engine settings for a [`Catalog`]
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub search: SearchConfig,
    pub recommend: RecommendConfig,
}

pub struct Catalog {
    brands: Arc<BrandTable>,
    store: ProductStore,
    search: SearchEngine,
    recommender: Recommender,
}

impl Catalog {
    pub fn new(brands: BrandTable, config: CatalogConfig) -> Self {
        let brands = Arc::new(brands);
        Self {
            search: SearchEngine::with_config(brands.clone(), config.search),
            recommender: Recommender::new(config.recommend),
            store: ProductStore::new(),
            brands,
        }
    }

    /// Build a catalog and publish the products found at `path`
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        brands: BrandTable,
        config: CatalogConfig,
    ) -> Result<Self> {
        let products = loader::load_products(path, &brands)?;
        let catalog = Self::new(brands, config);
        catalog.publish(products);
        Ok(catalog)
    }

    pub fn brands(&self) -> &BrandTable {
        &self.brands
    }

    /// Replace the catalog contents
    ///
    /// Brand fields are expected to be filled already (see [`loader::enrich`]).
    pub fn publish(&self, products: Vec<Product>) -> Arc<ProductSnapshot> {
        self.store.publish(products)
    }

    /// Enrich raw products with the catalog's brand table, then publish them
    pub fn publish_raw(&self, mut products: Vec<Product>) -> Arc<ProductSnapshot> {
        for product in &mut products {
            loader::enrich(product, &self.brands);
        }
        self.publish(products)
    }

    pub fn snapshot(&self) -> Arc<ProductSnapshot> {
        self.store.snapshot()
    }

    pub fn search(&self, query: &str) -> Result<Vec<Product>> {
        let snapshot = self.snapshot();
        guarded("search", query, || self.search.search(&snapshot, query))
    }

    pub fn recommend(&self, product_id: &str, limit: usize) -> Result<Vec<RecommendationEntry>> {
        let snapshot = self.snapshot();
        guarded("recommend", product_id, || {
            self.recommender.recommend(&snapshot, product_id, limit)
        })
    }

    /// Products whose big category contains `keyword`, in snapshot order
    pub fn by_big_category(&self, keyword: &str, limit: usize) -> Result<Vec<Product>> {
        let snapshot = self.snapshot();
        let products = snapshot.by_big_category(keyword, limit)?;
        tracing::debug!("Category {:?} -> {} products", keyword, products.len());
        Ok(products.into_iter().cloned().collect())
    }

    pub fn product(&self, product_id: &str) -> Result<Product> {
        self.snapshot()
            .get(product_id)
            .cloned()
            .ok_or_else(|| Error::ProductNotFound(product_id.to_string()))
    }

    pub fn stats(&self) -> CacheStats {
        self.snapshot().stats()
    }
}

/// Run an engine call, turning a panic into `Error::Internal`
///
/// Internal failures, panics included, are logged with the operation and input.
fn guarded<T, F>(operation: &str, input: &str, call: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Err(e @ Error::Internal(_))) => {
            tracing::error!("{} failed for {:?}: {}", operation, input, e);
            Err(e)
        }
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("{} failed for {:?}: {}", operation, input, message);
            Err(Error::Internal(format!("{} failed: {}", operation, message)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let catalog = Catalog::new(BrandTable::default(), CatalogConfig::default());
        catalog.publish_raw(vec![
            Product::new("1", "농심 신라면")
                .with_manufacturer("농심")
                .with_categories("라면", "면류"),
            Product::new("2", "오뚜기 진라면")
                .with_manufacturer("오뚜기")
                .with_categories("라면", "면류"),
        ]);
        catalog
    }

    #[test]
    fn test_publish_raw_enriches() {
        let catalog = catalog();
        assert_eq!(catalog.product("1").unwrap().brand_name_eng, "nongshim");
    }

    #[test]
    fn test_product_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.product("2").unwrap().product_name, "오뚜기 진라면");
        assert!(catalog.product("3").unwrap_err().is_not_found());
    }

    #[test]
    fn test_guarded_maps_panic_to_internal() {
        let result: Result<()> = guarded("test", "input", || panic!("boom"));
        match result {
            Err(Error::Internal(message)) => assert!(message.contains("boom")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_guarded_passes_errors_through() {
        let result: Result<()> = guarded("test", "input", || Err(Error::Unavailable));
        assert!(matches!(result, Err(Error::Unavailable)));
    }

    #[test]
    fn test_guarded_keeps_internal_errors() {
        let result: Result<()> =
            guarded("test", "input", || Err(Error::Internal("no vocabulary".to_string())));
        match result {
            Err(Error::Internal(message)) => assert_eq!(message, "no vocabulary"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_recommend_empty_vocabulary_is_internal() {
        let catalog = Catalog::new(BrandTable::default(), CatalogConfig::default());
        catalog.publish_raw(
            (0..5)
                .map(|i| Product::new(i.to_string(), "a").with_categories("x", "y"))
                .collect(),
        );
        assert!(matches!(catalog.recommend("0", 4), Err(Error::Internal(_))));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new(BrandTable::default(), CatalogConfig::default());
        assert!(matches!(catalog.recommend("1", 4), Err(Error::Unavailable)));
        assert!(catalog.search("라면").unwrap().is_empty());
        assert_eq!(catalog.stats().cached_products, 0);
    }
}

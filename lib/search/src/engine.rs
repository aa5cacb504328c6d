use catalogx_core::fuzzy::partial_ratio;
use catalogx_core::text::{jamo_similar, normalize};
use catalogx_core::{BrandTable, Error, Product, ProductSnapshot, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;

/// Thresholds for the cascading matcher
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Partial ratio needed in the primary fuzzy stage
    pub fuzzy_threshold: f64,
    /// Partial ratio needed in the fallback stage
    pub fallback_threshold: f64,
    /// Jamo ratio needed for a phonetic match in the fallback stage
    pub jamo_threshold: f64,
    /// Scan products on the rayon pool
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 85.0,
            fallback_threshold: 70.0,
            jamo_threshold: catalogx_core::text::DEFAULT_JAMO_THRESHOLD,
            parallel: true,
        }
    }
}

/// Stage that admitted a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStage {
    Exact,
    Substring,
    Fuzzy,
    Fallback,
}

/// A matched product and the stage that matched it
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub product: &'a Product,
    pub stage: MatchStage,
}

/// Normalized views of the fields the matcher reads
struct MatchFields {
    name: String,
    manufacturer: String,
    brand_kor: String,
    brand_eng: String,
}

impl MatchFields {
    fn of(product: &Product) -> Self {
        Self {
            name: normalize(&product.product_name),
            manufacturer: normalize(&product.manufacturer),
            brand_kor: normalize(&product.brand_name_kor),
            brand_eng: normalize(&product.brand_name_eng),
        }
    }
}

/// Stateless cascading matcher over a product snapshot
#[derive(Debug, Clone)]
pub struct SearchEngine {
    brands: Arc<BrandTable>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(brands: Arc<BrandTable>) -> Self {
        Self::with_config(brands, SearchConfig::default())
    }

    pub fn with_config(brands: Arc<BrandTable>, config: SearchConfig) -> Self {
        Self { brands, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search and return the matching products
    pub fn search(&self, snapshot: &ProductSnapshot, query: &str) -> Result<Vec<Product>> {
        Ok(self
            .search_hits(snapshot, query)?
            .into_iter()
            .map(|hit| hit.product.clone())
            .collect())
    }

    /// Search and report which stage admitted each product
    pub fn search_hits<'a>(
        &self,
        snapshot: &'a ProductSnapshot,
        query: &str,
    ) -> Result<Vec<SearchHit<'a>>> {
        if query.is_empty() {
            return Err(Error::InvalidQuery("query must not be empty".to_string()));
        }

        // A query that normalizes to "" is a substring of every name
        let keyword = normalize(query);
        let keywords: Vec<String> = self.brands.expand(&keyword).into_iter().collect();

        let primary = self.scan(snapshot, |product| self.primary_stage(product, &keywords));
        if !primary.is_empty() {
            tracing::debug!("Search {:?} -> {} results", query, primary.len());
            return Ok(primary);
        }

        tracing::info!("Search {:?} had no primary match, running fallback", query);
        let fallback = self.scan(snapshot, |product| {
            self.fallback_matches(product, &keywords)
                .then_some(MatchStage::Fallback)
        });
        tracing::debug!("Search {:?} -> {} results (fallback)", query, fallback.len());
        Ok(fallback)
    }

    /// First primary stage (exact, substring, fuzzy) that accepts `product`
    pub fn primary_stage(&self, product: &Product, keywords: &[String]) -> Option<MatchStage> {
        let fields = MatchFields::of(product);

        if keywords
            .iter()
            .any(|k| *k == fields.brand_kor || *k == fields.brand_eng || *k == fields.manufacturer)
        {
            return Some(MatchStage::Exact);
        }

        if keywords
            .iter()
            .any(|k| fields.name.contains(k.as_str()) || fields.manufacturer.contains(k.as_str()))
        {
            return Some(MatchStage::Substring);
        }

        let threshold = self.config.fuzzy_threshold;
        if keywords.iter().any(|k| {
            partial_ratio(k, &fields.name) >= threshold
                || partial_ratio(k, &fields.manufacturer) >= threshold
        }) {
            return Some(MatchStage::Fuzzy);
        }

        None
    }

    /// Relaxed fuzzy and phonetic test used when nothing matched
    ///
    /// The manufacturer is expanded through the brand table the same way the
    /// query keyword is.
    pub fn fallback_matches(&self, product: &Product, keywords: &[String]) -> bool {
        let fields = MatchFields::of(product);
        let manufacturer_forms = self.brands.expand(&fields.manufacturer);
        let fuzzy = self.config.fallback_threshold;
        let jamo = self.config.jamo_threshold;

        keywords.iter().any(|k| {
            partial_ratio(k, &fields.name) >= fuzzy
                || manufacturer_forms.iter().any(|m| partial_ratio(k, m) >= fuzzy)
                || partial_ratio(k, &fields.brand_kor) >= fuzzy
                || jamo_similar(k, &fields.name, jamo)
                || manufacturer_forms.iter().any(|m| jamo_similar(k, m, jamo))
                || jamo_similar(k, &fields.brand_kor, jamo)
        })
    }

    fn scan<'a, F>(&self, snapshot: &'a ProductSnapshot, classify: F) -> Vec<SearchHit<'a>>
    where
        F: Fn(&Product) -> Option<MatchStage> + Sync,
    {
        let hit =
            |product: &'a Product| classify(product).map(|stage| SearchHit { product, stage });
        if self.config.parallel {
            // collect() keeps snapshot order
            snapshot.products().par_iter().filter_map(hit).collect()
        } else {
            snapshot.products().iter().filter_map(hit).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogx_core::loader::enrich;

    fn product(id: &str, name: &str, manufacturer: &str) -> Product {
        let brands = BrandTable::default();
        let mut p = Product::new(id, name).with_manufacturer(manufacturer);
        enrich(&mut p, &brands);
        p
    }

    fn engine() -> SearchEngine {
        SearchEngine::new(Arc::new(BrandTable::default()))
    }

    fn ids(results: &[Product]) -> Vec<&str> {
        results.iter().map(|p| p.product_id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_rejected() {
        let snapshot = ProductSnapshot::new(1, vec![product("1", "새우깡", "농심")]);
        assert!(matches!(engine().search(&snapshot, ""), Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn test_query_without_word_characters_matches_everything() {
        let snapshot = ProductSnapshot::new(1, vec![
            product("1", "새우깡", "농심"),
            product("2", "초코파이", "오리온"),
            Product::new("3", ""),
        ]);
        for query in ["!!!", " ", "★"] {
            let results = engine().search(&snapshot, query).unwrap();
            assert_eq!(ids(&results), vec!["1", "2", "3"], "query {:?}", query);
        }
    }

    #[test]
    fn test_exact_manufacturer_match() {
        let snapshot = ProductSnapshot::new(1, vec![
            product("1", "맛있는 만두", "CJ제일제당"),
            product("2", "새우깡", "농심"),
        ]);
        let hits = engine().search_hits(&snapshot, "cj제일제당!").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product.product_id, "1");
        assert_eq!(hits[0].stage, MatchStage::Exact);
    }

    #[test]
    fn test_brand_synonym_exact_match() {
        let snapshot = ProductSnapshot::new(1, vec![
            product("1", "비비고 왕교자", "씨제이제일제당"),
            product("2", "새우깡", "농심"),
        ]);
        let hits = engine().search_hits(&snapshot, "Bibigo").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product.product_id, "1");
        assert_eq!(hits[0].stage, MatchStage::Exact);
    }

    #[test]
    fn test_english_query_finds_korean_name() {
        let snapshot = ProductSnapshot::new(1, vec![
            Product::new("1", "코카콜라 제로").with_manufacturer("엘지생활건강"),
            Product::new("2", "칠성사이다").with_manufacturer("롯데칠성음료"),
        ]);
        // Brand fields left empty: the match comes from the expanded substring
        let hits = engine().search_hits(&snapshot, "coke").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stage, MatchStage::Substring);
    }

    #[test]
    fn test_fuzzy_stage() {
        let snapshot = ProductSnapshot::new(1, vec![product("1", "bibigo mandu", "cj")]);
        let hits = engine().search_hits(&snapshot, "bibigoo").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].stage, MatchStage::Fuzzy);
    }

    #[test]
    fn test_primary_results_keep_snapshot_order() {
        let snapshot = ProductSnapshot::new(1, vec![
            product("a", "농심 신라면", "농심"),
            product("b", "삼양라면", "삼양식품"),
            product("c", "너구리 라면", "농심"),
        ]);
        let results = engine().search(&snapshot, "라면").unwrap();
        assert_eq!(ids(&results), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fallback_runs_only_on_empty_primary() {
        let snapshot = ProductSnapshot::new(1, vec![
            product("1", "오뚜기 진라면", "오뚜기"),
            product("2", "진라멘", ""),
        ]);
        // "2" only passes the jamo fallback, which never runs since "1" matches
        let hits = engine().search_hits(&snapshot, "진라면").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product.product_id, "1");
        assert_eq!(hits[0].stage, MatchStage::Substring);
    }

    #[test]
    fn test_fallback_relaxed_match() {
        let snapshot = ProductSnapshot::new(1, vec![
            product("1", "오뚜기 진라면", "오뚜기"),
            product("2", "농심 신라면", "농심"),
        ]);
        let hits = engine().search_hits(&snapshot, "오뚜개").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product.product_id, "1");
        assert_eq!(hits[0].stage, MatchStage::Fallback);
    }

    #[test]
    fn test_fallback_expands_manufacturer() {
        let brands = Arc::new(BrandTable::default());
        let engine = SearchEngine::new(brands);
        // Only the English form of the manufacturer resembles the keyword
        let p = Product::new("1", "컵라면").with_manufacturer("농심");
        let keywords = vec!["nongshimm".to_string()];
        assert!(engine.primary_stage(&p, &keywords).is_none());
        assert!(engine.fallback_matches(&p, &keywords));
    }

    #[test]
    fn test_missing_fields_do_not_fail() {
        let snapshot =
            ProductSnapshot::new(1, vec![Product::new("1", ""), product("2", "새우깡", "")]);
        let results = engine().search(&snapshot, "새우").unwrap();
        assert_eq!(ids(&results), vec!["2"]);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let products: Vec<Product> = (0..200)
            .map(|i| {
                let manufacturer = if i % 3 == 0 { "농심" } else { "오뚜기" };
                product(&i.to_string(), &format!("상품 {} 라면", i), manufacturer)
            })
            .collect();
        let snapshot = ProductSnapshot::new(1, products);
        let brands = Arc::new(BrandTable::default());
        let parallel = SearchEngine::new(brands.clone());
        let sequential = SearchEngine::with_config(
            brands,
            SearchConfig {
                parallel: false,
                ..Default::default()
            },
        );

        for query in ["nongshim", "라면", "오뚜기", "zzz"] {
            assert_eq!(
                ids(&parallel.search(&snapshot, query).unwrap()),
                ids(&sequential.search(&snapshot, query).unwrap())
            );
        }
    }
}

//! # catalogx
//!
//! In-memory product catalog queries for Korean/English grocery data.
//!
//! catalogx loads a product dump once, freezes it into an immutable snapshot,
//! and answers two kinds of questions against it:
//!
//! - **Search**: a cascading matcher (exact, substring, fuzzy, then a relaxed
//!   fuzzy and jamo-phonetic fallback) with brand synonym expansion, so that
//!   `coke` finds 코카콜라 and `오뚜개` still finds 오뚜기
//! - **Recommend**: TF-IDF cosine similarity within a product's category,
//!   adjusted by where warning ingredients appear, and reranked by name
//!   similarity
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! catalogx --data products.json search 비비고
//! catalogx --data products.json recommend 8801234567890 --limit 4
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use catalogx::prelude::*;
//!
//! let catalog = Catalog::new(BrandTable::default(), CatalogConfig::default());
//! catalog.publish_raw(vec![
//!     Product::new("1", "비비고 왕교자").with_manufacturer("씨제이제일제당"),
//!     Product::new("2", "농심 새우깡").with_manufacturer("농심"),
//! ]);
//!
//! let results = catalog.search("bibigo").unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].product_id, "1");
//! ```
//!
//! ## Crate Structure
//!
//! catalogx is composed of several crates:
//!
//! - [`catalogx-core`](https://docs.rs/catalogx-core) - Product model, snapshots,
//!   normalization, fuzzy ratios, brands, TF-IDF
//! - [`catalogx-search`](https://docs.rs/catalogx-search) - Cascading search engine
//! - [`catalogx-similarity`](https://docs.rs/catalogx-similarity) - Similar product recommendations

pub mod service;

// Re-export core types
pub use catalogx_core::{
    BrandEntry, BrandTable,
    Product, RawMaterials, RecommendationEntry,
    ProductSnapshot, ProductStore, CacheStats,
    Filter, ProductFilter,
    TfidfModel,
    Error, Result,
};
pub use catalogx_core::loader;

// Re-export engines
pub use catalogx_search::{MatchStage, SearchConfig, SearchEngine, SearchHit};
pub use catalogx_similarity::{RecommendConfig, Recommender, ScopeKey, ScoredCandidate};

pub use service::{Catalog, CatalogConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogConfig,
        BrandTable, Product, RecommendationEntry,
        SearchConfig, RecommendConfig,
        CacheStats,
        Error, Result,
    };
}

/// Text helpers used by the engines
pub mod text {
    pub use catalogx_core::fuzzy::{partial_ratio, ratio};
    pub use catalogx_core::text::{jamo_similar, normalize, to_jamo};
}

//! # catalogx Search
//!
//! Free-text product search with Korean/English brand synonyms.
//!
//! Each product is tested against the expanded keyword set in stages and is
//! kept by the first stage that accepts it:
//!
//! 1. **Exact** - a keyword equals the brand (Korean or English) or manufacturer
//! 2. **Substring** - a keyword occurs in the product name or manufacturer
//! 3. **Fuzzy** - partial ratio against name or manufacturer of at least 85
//!
//! Only when no product passes any of these does the relaxed **Fallback**
//! stage run: partial ratio of at least 70 or jamo (phonetic) similarity
//! against the name, the brand-expanded manufacturer and the Korean brand.
//!
//! Results always come back in snapshot order.
//!
//! ## Example
//!
//! ```rust
//! use catalogx_core::{BrandTable, Product, ProductSnapshot};
//! use catalogx_search::SearchEngine;
//! use std::sync::Arc;
//!
//! let snapshot = ProductSnapshot::new(1, vec![
//!     Product::new("p1", "비비고 왕교자").with_manufacturer("씨제이제일제당"),
//! ]);
//! let engine = SearchEngine::new(Arc::new(BrandTable::default()));
//! let results = engine.search(&snapshot, "왕교자").unwrap();
//! assert_eq!(results.len(), 1);
//! ```

pub mod engine;

pub use engine::{MatchStage, SearchConfig, SearchEngine, SearchHit};

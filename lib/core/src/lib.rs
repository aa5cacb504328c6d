//! # catalogx Core
//!
//! Core library for the catalogx product query service.
//!
//! This crate provides the data model and text machinery shared by the
//! search and recommendation engines:
//!
//! - [`Product`] - A catalog record with derived brand fields
//! - [`ProductSnapshot`] / [`ProductStore`] - Frozen catalog views and their publisher
//! - [`BrandTable`] - Korean/English brand synonyms and keyword expansion
//! - [`TfidfModel`] - Term-frequency / inverse-document-frequency vectors
//! - [`text`] and [`fuzzy`] - Normalization, jamo decomposition and fuzzy ratios
//!
//! ## Example
//!
//! ```rust
//! use catalogx_core::{BrandTable, Product, ProductStore, loader};
//!
//! let brands = BrandTable::default();
//! let mut product = Product::new("p1", "비비고 왕교자");
//! loader::enrich(&mut product, &brands);
//! assert_eq!(product.brand_name_eng, "bibigo");
//!
//! let store = ProductStore::new();
//! let snapshot = store.publish(vec![product]);
//! assert_eq!(snapshot.len(), 1);
//!
//! assert!(brands.expand("bibigo").contains("비비고"));
//! ```

pub mod brand;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod loader;
pub mod product;
pub mod store;
pub mod text;
pub mod tfidf;

pub use brand::{BrandEntry, BrandTable};
pub use error::{Error, Result};
pub use filter::{Filter, ProductFilter};
pub use product::{Product, RawMaterials, RecommendationEntry};
pub use store::{CacheStats, ProductSnapshot, ProductStore};
pub use tfidf::TfidfModel;

//! # catalogx Similarity
//!
//! Content-based "similar products" recommendations.
//!
//! ## Scoring
//!
//! - **Scope**: the target's category, widened to its big category when the
//!   category holds fewer than five products
//! - **Similarity**: cosine similarity between TF-IDF vectors of the
//!   descriptive text (name, category and raw-material fields)
//! - **Adjustment**: ingredient position of the candidate's warning items
//!   ([`position_penalty`])
//! - **Rerank**: name-similar candidates first, backfilled by score
//!
//! ## Example
//!
//! ```rust
//! use catalogx_core::{Product, ProductSnapshot};
//! use catalogx_similarity::Recommender;
//!
//! let names = ["딸기우유", "바나나우유", "초코우유", "커피우유", "메론우유"];
//! let products: Vec<Product> = names
//!     .iter()
//!     .enumerate()
//!     .map(|(i, name)| {
//!         Product::new(i.to_string(), format!("서울 {}", name))
//!             .with_categories("가공유", "유가공품")
//!     })
//!     .collect();
//! let snapshot = ProductSnapshot::new(1, products);
//!
//! let recommender = Recommender::default();
//! let similar = recommender.recommend(&snapshot, "0", 4).unwrap();
//! assert_eq!(similar.len(), 4);
//! assert!(similar.iter().all(|entry| entry.product_id != "0"));
//! ```

pub mod penalty;
pub mod recommend;

pub use penalty::position_penalty;
pub use recommend::{RecommendConfig, Recommender, ScopeKey, ScopeModel, ScoredCandidate};

//! Similar product recommendations
//!
//! Candidates come from the target's category (or its big category when the
//! category is too small), are scored by TF-IDF cosine similarity plus the
//! ingredient position adjustment, and are then reranked so that products
//! with a similar name come first. Backfill keeps the result at the requested
//! size whenever enough candidates exist.

use crate::penalty::position_penalty;
use ahash::{AHashMap, AHashSet};
use catalogx_core::fuzzy::partial_ratio;
use catalogx_core::{
    Error, Filter, Product, ProductFilter, ProductSnapshot, RecommendationEntry, Result, TfidfModel,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Tunables for the recommender
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    /// Below this many same-category products the scope widens to the big category
    pub min_category_peers: usize,
    /// Best-scored candidates considered for the name filter
    pub primary_pool: usize,
    /// Partial ratio between names needed to stay in the primary set
    pub name_similarity_threshold: f64,
    /// Reuse fitted scope models until the snapshot changes
    pub cache_models: bool,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_limit: 4,
            max_limit: 10,
            min_category_peers: 5,
            primary_pool: 200,
            name_similarity_threshold: 40.0,
            cache_models: true,
        }
    }
}

/// Which slice of the catalog a recommendation draws from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScopeKey {
    Category(String),
    BigCategory(String),
}

impl ScopeKey {
    fn filter(&self) -> ProductFilter {
        match self {
            ScopeKey::Category(c) => ProductFilter::Category(c.clone()),
            ScopeKey::BigCategory(b) => ProductFilter::BigCategory(b.clone()),
        }
    }
}

/// TF-IDF model fit on one scope
#[derive(Debug)]
pub struct ScopeModel {
    key: ScopeKey,
    /// Snapshot positions of the scope members, in snapshot order
    members: Vec<usize>,
    model: TfidfModel,
}

impl ScopeModel {
    /// Fit a model on every product matching `key`
    pub fn build(snapshot: &ProductSnapshot, key: ScopeKey) -> Result<Self> {
        let filter = key.filter();
        let members: Vec<usize> = snapshot
            .products()
            .iter()
            .enumerate()
            .filter(|(_, p)| filter.matches(p))
            .map(|(idx, _)| idx)
            .collect();

        let texts: Vec<String> = members
            .iter()
            .map(|&idx| snapshot.products()[idx].descriptive_text())
            .collect();

        let model = TfidfModel::fit(&texts)
            .ok_or_else(|| Error::Internal(format!("empty vocabulary for scope {:?}", key)))?;

        Ok(Self { key, members, model })
    }

    pub fn key(&self) -> &ScopeKey {
        &self.key
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Fitted scope models for the newest snapshot generation seen
#[derive(Debug, Default)]
struct ScopeCache {
    generation: u64,
    models: AHashMap<ScopeKey, Arc<ScopeModel>>,
}

/// A scored candidate with its score breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate<'a> {
    pub product: &'a Product,
    /// Cosine similarity to the target
    pub similarity: f32,
    /// Ingredient position adjustment
    pub penalty: f32,
    /// `similarity + penalty`
    pub score: f32,
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    index: usize,
    similarity: f32,
    penalty: f32,
    score: f32,
}

fn sort_by_score(candidates: &mut [Scored]) {
    // Stable: equal scores keep scope order
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

/// Content-based recommender
#[derive(Debug, Default)]
pub struct Recommender {
    config: RecommendConfig,
    cache: RwLock<ScopeCache>,
}

impl Recommender {
    pub fn new(config: RecommendConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(ScopeCache::default()),
        }
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Recommend up to `limit` products similar to `product_id`
    pub fn recommend(
        &self,
        snapshot: &ProductSnapshot,
        product_id: &str,
        limit: usize,
    ) -> Result<Vec<RecommendationEntry>> {
        Ok(self
            .rank(snapshot, product_id, limit)?
            .into_iter()
            .map(|c| RecommendationEntry::from(c.product))
            .collect())
    }

    /// Same as [`recommend`](Self::recommend), keeping the score breakdown
    pub fn rank<'a>(
        &self,
        snapshot: &'a ProductSnapshot,
        product_id: &str,
        limit: usize,
    ) -> Result<Vec<ScoredCandidate<'a>>> {
        if limit == 0 || limit > self.config.max_limit {
            return Err(Error::InvalidLimit {
                value: limit,
                min: 1,
                max: self.config.max_limit,
            });
        }
        if snapshot.is_empty() {
            return Err(Error::Unavailable);
        }
        let target = snapshot
            .get(product_id)
            .ok_or_else(|| Error::ProductNotFound(product_id.to_string()))?;

        let key = self.scope_key(snapshot, target);
        let scope = self.scope_model(snapshot, key)?;
        let products = snapshot.products();

        let target_pos = scope
            .members
            .iter()
            .position(|&idx| products[idx].product_id == product_id)
            .ok_or_else(|| Error::NotInScope(product_id.to_string()))?;

        let similarities = scope.model.similarities(target_pos);
        let mut ranked: Vec<Scored> = scope
            .members
            .iter()
            .enumerate()
            .filter(|&(pos, _)| pos != target_pos)
            .map(|(pos, &index)| {
                let similarity = similarities[pos];
                let penalty = position_penalty(&products[index].raw_materials);
                Scored {
                    index,
                    similarity,
                    penalty,
                    score: similarity + penalty,
                }
            })
            .collect();
        sort_by_score(&mut ranked);

        // Name-similar candidates among the best-scored pool
        let target_name = target.product_name.as_str();
        let mut selected: Vec<Scored> = ranked
            .iter()
            .take(self.config.primary_pool)
            .filter(|c| {
                partial_ratio(target_name, &products[c.index].product_name)
                    >= self.config.name_similarity_threshold
            })
            .copied()
            .collect();

        if selected.len() < limit {
            let chosen: AHashSet<usize> = selected.iter().map(|c| c.index).collect();
            let missing = limit - selected.len();
            selected.extend(
                ranked
                    .iter()
                    .filter(|c| !chosen.contains(&c.index))
                    .take(missing)
                    .copied(),
            );
        }

        sort_by_score(&mut selected);
        selected.truncate(limit);

        tracing::debug!(
            "Recommend {} in {:?}: {} candidates, {} returned",
            product_id,
            scope.key,
            ranked.len(),
            selected.len()
        );

        Ok(selected
            .into_iter()
            .map(|c| ScoredCandidate {
                product: &products[c.index],
                similarity: c.similarity,
                penalty: c.penalty,
                score: c.score,
            })
            .collect())
    }

    /// Category scope, widened to the big category when the category has
    /// fewer than `min_category_peers` products (the target included)
    pub fn scope_key(&self, snapshot: &ProductSnapshot, target: &Product) -> ScopeKey {
        let peers = snapshot
            .products()
            .iter()
            .filter(|p| p.category == target.category)
            .count();
        if peers < self.config.min_category_peers {
            ScopeKey::BigCategory(target.big_category.clone())
        } else {
            ScopeKey::Category(target.category.clone())
        }
    }

    fn scope_model(&self, snapshot: &ProductSnapshot, key: ScopeKey) -> Result<Arc<ScopeModel>> {
        if !self.config.cache_models {
            return ScopeModel::build(snapshot, key).map(Arc::new);
        }

        let generation = snapshot.generation();
        {
            let cache = self.cache.read();
            if cache.generation == generation {
                if let Some(model) = cache.models.get(&key) {
                    return Ok(model.clone());
                }
            }
        }

        let model = Arc::new(ScopeModel::build(snapshot, key.clone())?);

        let mut cache = self.cache.write();
        if generation > cache.generation {
            cache.generation = generation;
            cache.models.clear();
        }
        // Readers of an older snapshot do not populate the cache
        if generation == cache.generation {
            cache.models.insert(key, model.clone());
        }
        Ok(model)
    }

    /// Number of cached scope models
    pub fn cached_models(&self) -> usize {
        self.cache.read().models.len()
    }
}

//! Ingredient position adjustment
//!
//! Ingredient labels list components in descending quantity. A flagged
//! (warning) ingredient near the front of the list lowers a candidate's
//! score, one near the very end raises it.

use catalogx_core::RawMaterials;

/// Warnings at or before this fraction of the list are penalized
pub const EARLY_FRACTION: f64 = 0.5;
/// Warnings at or after this fraction of the list earn a bonus
pub const LATE_FRACTION: f64 = 0.9;
/// Size of one penalty or bonus
pub const STEP: f32 = 0.5;

/// Sum of per-warning adjustments for one product
///
/// Each warning found in the ingredient list contributes `-STEP` when its
/// first occurrence sits at `index / len <= EARLY_FRACTION`, `+STEP` when
/// `index / len >= LATE_FRACTION`, and nothing in between.
pub fn position_penalty(raw_materials: &RawMaterials) -> f32 {
    let ingredients = raw_materials.ingredients();
    if ingredients.is_empty() {
        return 0.0;
    }
    let total = ingredients.len() as f64;

    raw_materials
        .warnings()
        .into_iter()
        .filter_map(|warning| ingredients.iter().position(|i| *i == warning))
        .map(|index| {
            let fraction = index as f64 / total;
            if fraction <= EARLY_FRACTION {
                -STEP
            } else if fraction >= LATE_FRACTION {
                STEP
            } else {
                0.0
            }
        })
        .sum()
}

//! Cost ranges of recipe options, rolled up from their parts.

use cpc_core::{ProfitNode, RecipeCost, RecipeOption};

/// Cost range of one part at its full quantity, or `None` when it cannot be priced.
///
/// Vendor-sold parts cost the vendor price. Parts nobody can craft cost their
/// auction prices. Craftable parts take the extremes and the mean of their
/// own priced options, falling back to their auction prices when no option
/// could be priced.
fn part_cost(part: &ProfitNode) -> Option<RecipeCost> {
    if let Some(unit) = part.vendor_price {
        let total = unit * part.quantity;
        return Some(RecipeCost {
            high: total,
            low: total,
            average: total,
        });
    }

    let auction = || {
        (!part.ah_price.is_empty()).then(|| {
            let scaled = part.ah_price.scaled(part.quantity);
            RecipeCost {
                high: scaled.high,
                low: scaled.low,
                average: scaled.average,
            }
        })
    };
    if !part.craftable {
        return auction();
    }

    let priced: Vec<&RecipeCost> = part
        .recipes
        .iter()
        .map(|o| &o.cost)
        .filter(|c| c.average > 0.0)
        .collect();
    if priced.is_empty() {
        return auction();
    }
    #[allow(clippy::cast_precision_loss)]
    let count = priced.len() as f64;
    Some(RecipeCost {
        high: priced.iter().map(|c| c.high).fold(f64::MIN, f64::max),
        low: priced.iter().map(|c| c.low).fold(f64::MAX, f64::min),
        average: priced.iter().map(|c| c.average).sum::<f64>() / count,
    })
}

/// Roll the cost of crafting through `option` up from its parts.
///
/// Part quantities already include the number of crafts, so part costs are
/// summed as-is. If any part cannot be priced the whole option is reported
/// as zero cost.
#[must_use]
pub fn recipe_cost(option: &RecipeOption) -> RecipeCost {
    let mut total = RecipeCost::default();
    for part in &option.parts {
        let Some(cost) = part_cost(part) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                recipe = option.recipe_id,
                part = part.item_id,
                "unpriced part, cost unknown"
            );
            return RecipeCost::default();
        };
        total.high += cost.high;
        total.low += cost.low;
        total.average += cost.average;
    }
    if total.average.is_nan() {
        return RecipeCost::default();
    }
    total
}

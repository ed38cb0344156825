use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use cpc_core::oracle;
use cpc_core::static_data::shifted_level;
use cpc_core::wire::{AuctionSnapshot, RecipeDetail};
use cpc_core::{
    BonusId, BonusPrice, CpcError, CyclicLinkTable, ItemId, ItemRef, ProfitNode, RecipeCost,
    RecipeOption, RecipeOutput, RecipeRef, Region, RunConfiguration,
};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::cost::recipe_cost;
use super::util::bounded_in_order;
use crate::Calculator;

/// Per-request state shared by every node of one resolution.
struct Walk<'a> {
    region: Region,
    professions: &'a [String],
    snapshot: &'a AuctionSnapshot,
}

/// Output range of a recipe; an unset range falls back to the nominal value.
pub(crate) fn recipe_output(recipe: &RecipeDetail) -> RecipeOutput {
    let q = &recipe.crafted_quantity;
    let value = f64::from(q.value);
    let (min, max) = if q.minimum == 0 && q.maximum == 0 {
        (value, value)
    } else {
        (f64::from(q.minimum), f64::from(q.maximum))
    };
    RecipeOutput { min, max, value }
}

impl Calculator {
    /// Price the full recipe tree of `quantity` units of `item` on `realm`.
    ///
    /// Fetches one auction snapshot for the realm and reuses it for every
    /// node. An empty `professions` list means every profession of the
    /// region.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown item or realm, `CyclicRecipe` when a
    /// reagent loops back into its own recipe chain, `DepthExceeded` when the
    /// tree is deeper than configured, and propagates fetch failures. No
    /// partial tree is returned.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cpc::resolver::resolve",
            skip(self, professions),
            fields(item = %item)
        )
    )]
    pub async fn resolve(
        &self,
        region: Region,
        realm: &str,
        professions: &[String],
        item: &ItemRef,
        quantity: u32,
    ) -> Result<ProfitNode, CpcError> {
        let item = self.catalog.resolve_item(region, item).await?;
        let realm_id = self.catalog.connected_realm_id(region, realm).await?;
        let snapshot = self.catalog.auctions(region, realm_id).await?;
        self.resolve_with_snapshot(region, professions, item, f64::from(quantity), &snapshot)
            .await
    }

    /// [`resolve`](Self::resolve) driven by a run configuration.
    ///
    /// # Errors
    /// Same as [`resolve`](Self::resolve).
    pub async fn resolve_run(&self, run: &RunConfiguration) -> Result<ProfitNode, CpcError> {
        self.resolve(run.region, &run.realm, &run.professions, &run.item, run.count)
            .await
    }

    /// Price the recipe tree of `item` against an auction snapshot the caller already holds.
    ///
    /// # Errors
    /// Same as [`resolve`](Self::resolve), minus realm lookup failures.
    pub async fn resolve_with_snapshot(
        &self,
        region: Region,
        professions: &[String],
        item: ItemId,
        quantity: f64,
        snapshot: &AuctionSnapshot,
    ) -> Result<ProfitNode, CpcError> {
        let walk = Walk {
            region,
            professions,
            snapshot,
        };
        self.resolve_node(&walk, item, quantity, Vec::new()).await
    }

    fn resolve_node<'a>(
        &'a self,
        walk: &'a Walk<'a>,
        item: ItemId,
        quantity: f64,
        path: Vec<ItemId>,
    ) -> BoxFuture<'a, Result<ProfitNode, CpcError>> {
        async move {
            if path.len() >= self.cfg.max_depth {
                return Err(CpcError::DepthExceeded {
                    depth: self.cfg.max_depth,
                });
            }

            let detail = self.catalog.item_details(walk.region, item).await?;
            let status = self
                .crafting_status(walk.region, item, walk.professions)
                .await?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                item,
                name = %detail.name,
                quantity,
                craftable = status.craftable,
                depth = path.len(),
                "resolving node"
            );

            let mut node = ProfitNode {
                item_id: item,
                item_name: detail.name.clone(),
                quantity,
                base_level: detail.level,
                vendor_price: None,
                ah_price: oracle::summarize(walk.snapshot, item, None),
                bonus_prices: Vec::new(),
                craftable: false,
                recipes: Vec::new(),
            };

            let leveled: Vec<(BonusId, u32)> = oracle::distinct_bonuses(walk.snapshot, item)
                .into_iter()
                .filter_map(|bonus| {
                    let delta = self.statics.level_delta(bonus);
                    (delta != 0).then(|| (bonus, shifted_level(detail.level, delta)))
                })
                .collect();

            if !status.craftable {
                node.vendor_price = detail.vendor_unit_price().filter(|p| *p > 0.0);
                node.bonus_prices = leveled
                    .iter()
                    .map(|&(bonus, level)| BonusPrice {
                        level,
                        bonus,
                        price: oracle::summarize(walk.snapshot, item, Some(bonus)),
                    })
                    .collect();
                return Ok(node);
            }

            let bonus_link: HashMap<u32, BonusId> =
                leveled.iter().map(|&(bonus, level)| (level, bonus)).collect();
            let ranked = status.recipes.len() > 1;
            let mut path = path;
            path.push(item);

            let mut links: HashMap<(u32, u32), CyclicLinkTable> = HashMap::new();
            for (index, found) in status.recipes.iter().enumerate() {
                let table = match links.entry((found.profession_id, found.skill_tier)) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => {
                        let found_links = self
                            .tier_cyclic_links(walk.region, found.profession_id, found.skill_tier)
                            .await?;
                        e.insert(CyclicLinkTable::from_links(&found_links))
                    }
                };

                let rank = if ranked {
                    self.statics.ranks().level_for(index)
                } else {
                    0
                };
                let option = self
                    .resolve_option(walk, item, quantity, found, table, &path)
                    .await?;
                let rank_price = bonus_link
                    .get(&rank)
                    .filter(|_| rank != 0)
                    .map(|&bonus| oracle::summarize(walk.snapshot, item, Some(bonus)));
                node.recipes.push(RecipeOption {
                    rank,
                    rank_price,
                    ..option
                });
            }

            node.craftable = !node.recipes.is_empty();
            Ok(node)
        }
        .boxed()
    }

    async fn resolve_option(
        &self,
        walk: &Walk<'_>,
        item: ItemId,
        quantity: f64,
        found: &RecipeRef,
        links: &CyclicLinkTable,
        path: &[ItemId],
    ) -> Result<RecipeOption, CpcError> {
        let recipe = self.catalog.recipe(walk.region, found.recipe_id).await?;
        let output = recipe_output(&recipe);
        let crafts = if output.min > 0.0 {
            quantity / output.min
        } else {
            quantity
        };

        let on_path: HashSet<ItemId> = path.iter().copied().collect();
        for line in &recipe.reagents {
            let reagent = line.reagent.id;
            let loops_back = links.edges(reagent).iter().any(|e| e.partner == item);
            if loops_back || on_path.contains(&reagent) {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    item,
                    reagent,
                    recipe = recipe.id,
                    "refusing to recurse into a recipe cycle"
                );
                return Err(CpcError::CyclicRecipe {
                    item: reagent,
                    partner: item,
                });
            }
        }

        let parts = bounded_in_order(
            self.fan_out(),
            recipe.reagents.iter().map(|line| {
                self.resolve_node(
                    walk,
                    line.reagent.id,
                    f64::from(line.quantity) * crafts,
                    path.to_vec(),
                )
            }),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        let mut option = RecipeOption {
            recipe_id: recipe.id,
            recipe_name: recipe.name,
            profession: found.profession.clone(),
            rank: 0,
            output,
            rank_price: None,
            cost: RecipeCost::default(),
            parts,
        };
        option.cost = recipe_cost(&option);
        Ok(option)
    }
}

#[cfg(test)]
mod tests {
    use cpc_core::wire::CraftedQuantity;

    use super::*;

    fn recipe(minimum: u32, maximum: u32, value: u32) -> RecipeDetail {
        RecipeDetail {
            id: 1,
            name: "r".into(),
            crafted_item: None,
            alliance_crafted_item: None,
            horde_crafted_item: None,
            reagents: Vec::new(),
            crafted_quantity: CraftedQuantity {
                minimum,
                maximum,
                value,
            },
        }
    }

    #[test]
    fn output_range_falls_back_to_value() {
        let out = recipe_output(&recipe(0, 0, 2));
        assert!((out.min - 2.0).abs() < f64::EPSILON);
        assert!((out.max - 2.0).abs() < f64::EPSILON);

        let out = recipe_output(&recipe(3, 5, 0));
        assert!((out.min - 3.0).abs() < f64::EPSILON);
        assert!((out.max - 5.0).abs() < f64::EPSILON);
    }
}

//! Recipe pairs that convert two items into each other.

use cpc_core::wire::RecipeDetail;
use cpc_core::{CacheNamespace, CpcError, CyclicLink, CyclicLinkTable, LinkSide, Region};

use super::util::{bounded_in_order, collapse_errors};
use crate::Calculator;

fn link_side(recipe: &RecipeDetail) -> Option<LinkSide> {
    match recipe.reagents.as_slice() {
        [only] => Some(LinkSide {
            recipe_id: recipe.id,
            outputs: recipe.crafted_ids(),
            reagent: only.reagent.id,
            reagent_quantity: only.quantity,
        }),
        _ => None,
    }
}

/// Every pair of single-reagent recipes where each one consumes an output of the other.
///
/// The result does not depend on the order of `sides`: pairs are sorted by
/// their lower recipe id, then their higher one.
#[must_use]
pub fn find_cyclic_links(sides: &[LinkSide]) -> Vec<CyclicLink> {
    let mut links = Vec::new();
    for (i, a) in sides.iter().enumerate() {
        for b in &sides[i + 1..] {
            if a.recipe_id != b.recipe_id
                && b.outputs.contains(&a.reagent)
                && a.outputs.contains(&b.reagent)
            {
                links.push(CyclicLink::new(a.clone(), b.clone()));
            }
        }
    }
    links.sort_by_key(|l| (l.first.recipe_id, l.second.recipe_id));
    links.dedup_by_key(|l| (l.first.recipe_id, l.second.recipe_id));
    links
}

impl Calculator {
    /// Cyclic links within one skill tier of a profession.
    ///
    /// # Errors
    /// Propagates fetch and decode failures of the tier or its recipes.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cpc::resolver::tier_cyclic_links", skip(self))
    )]
    pub async fn tier_cyclic_links(
        &self,
        region: Region,
        profession: u32,
        tier: u32,
    ) -> Result<Vec<CyclicLink>, CpcError> {
        let detail = self.catalog.skill_tier(region, profession, tier).await?;
        let key = format!("{region}::{}::{profession}", detail.name);
        self.catalog
            .cache()
            .get_or_compute(CacheNamespace::CyclicLinks, &key, || async {
                let mut sides = Vec::new();
                for entry in detail.categories.iter().flat_map(|c| c.recipes.iter()) {
                    let recipe = self.catalog.recipe(region, entry.id).await?;
                    if let Some(side) = link_side(&recipe) {
                        sides.push(side);
                    }
                }
                let links = find_cyclic_links(&sides);
                #[cfg(feature = "tracing")]
                for link in &links {
                    tracing::debug!(
                        first = link.first.recipe_id,
                        second = link.second.recipe_id,
                        tier = %detail.name,
                        "found cyclic link"
                    );
                }
                Ok(links)
            })
            .await
    }

    /// Cyclic links across every selected skill tier of a profession set.
    ///
    /// An empty `professions` list means every profession of the region.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unknown profession and propagates fetch
    /// failures.
    pub async fn cyclic_links(
        &self,
        region: Region,
        professions: &[String],
    ) -> Result<CyclicLinkTable, CpcError> {
        let ids: Vec<u32> = if professions.is_empty() {
            self.catalog
                .profession_index(region)
                .await?
                .professions
                .into_iter()
                .map(|p| p.id)
                .collect()
        } else {
            let mut ids = Vec::with_capacity(professions.len());
            for name in professions {
                ids.push(self.catalog.profession_id(region, name).await?);
            }
            ids
        };

        let mut tiers = Vec::new();
        for id in ids {
            let prof = self.catalog.profession(region, id).await?;
            tiers.extend(
                prof.skill_tiers
                    .iter()
                    .filter(|t| self.tier_selected(&t.name))
                    .map(|t| (id, t.id)),
            );
        }

        let results = bounded_in_order(
            self.fan_out(),
            tiers
                .into_iter()
                .map(|(prof, tier)| self.tier_cyclic_links(region, prof, tier)),
        )
        .await;
        let links: Vec<CyclicLink> = collapse_errors(results)?.into_iter().flatten().collect();
        Ok(CyclicLinkTable::from_links(&links))
    }
}

//! Which recipes of a profession set craft an item.

use cpc_core::wire::{ItemDetail, NamedRef, Profession, RecipeCategory, SkillTier};
use cpc_core::{CacheNamespace, CpcError, CraftingStatus, ItemId, RecipeRef, Region};

use super::util::{bounded_in_order, collapse_errors};
use crate::Calculator;

const ENCHANTING_TIER: &str = "Enchanting";
const ENCHANT_PREFIX: &str = "Enchant ";
// The upstream data misspells some category names.
const ENCHANTMENT_SUFFIXES: [&str; 2] = [" Enchantments", " Echantments"];

/// Equipment slot named by an enchantment category, e.g. "Boot Enchantments" -> "Boots".
///
/// Returns `None` for categories that are not enchantment categories.
#[must_use]
pub fn slot_name(category: &str) -> Option<String> {
    let slot = ENCHANTMENT_SUFFIXES
        .iter()
        .find_map(|suffix| category.find(suffix).map(|at| &category[..at]))?;
    Some(match slot {
        "Boot" => "Boots".to_string(),
        "Glove" => "Gloves".to_string(),
        other => other.to_string(),
    })
}

impl Calculator {
    /// Crafting status of `item` for a set of professions.
    ///
    /// An empty `professions` list means every profession of the region.
    /// Items whose description mentions a vendor are never craftable.
    /// Professions are scanned concurrently; recipes are reported in
    /// profession order, then skill tier order, then book order.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unknown profession name. When several
    /// professions fail, their errors are wrapped in `Multiple`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cpc::resolver::crafting_status",
            skip(self, professions),
            fields(professions = professions.len())
        )
    )]
    pub async fn crafting_status(
        &self,
        region: Region,
        item: ItemId,
        professions: &[String],
    ) -> Result<CraftingStatus, CpcError> {
        let cache = self.catalog.cache();
        let key = format!("{region}::{item}::{professions:?}");
        if let Some(status) = cache.get(CacheNamespace::CraftableByProfessions, &key).await? {
            return Ok(status);
        }

        let detail = self.catalog.item_details(region, item).await?;
        if detail.mentions_vendor() {
            #[cfg(feature = "tracing")]
            tracing::debug!(item, "vendor item, skipping recipe scan");
            return Ok(CraftingStatus::not_craftable());
        }

        let names: Vec<String> = if professions.is_empty() {
            self.catalog
                .profession_index(region)
                .await?
                .professions
                .into_iter()
                .map(|p| p.name)
                .collect()
        } else {
            professions.to_vec()
        };

        let detail = &detail;
        let results = bounded_in_order(
            self.fan_out(),
            names
                .iter()
                .map(|name| self.profession_status(region, detail, name)),
        )
        .await;

        let mut status = CraftingStatus::not_craftable();
        for found in collapse_errors(results)? {
            status.absorb(found);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            item,
            craftable = status.craftable,
            recipes = status.recipe_ids.len(),
            "crafting status"
        );

        cache
            .set(CacheNamespace::CraftableByProfessions, &key, &status)
            .await?;
        Ok(status)
    }

    async fn profession_status(
        &self,
        region: Region,
        item: &ItemDetail,
        profession: &str,
    ) -> Result<CraftingStatus, CpcError> {
        let key = format!("{region}:{profession}:{}", item.id);
        self.catalog
            .cache()
            .get_or_compute(CacheNamespace::CraftableByProfession, &key, || async {
                let id = self.catalog.profession_id(region, profession).await?;
                let prof = self.catalog.profession(region, id).await?;
                let tiers: Vec<&NamedRef> = prof
                    .skill_tiers
                    .iter()
                    .filter(|t| self.tier_selected(&t.name))
                    .collect();

                let prof = &prof;
                let results = bounded_in_order(
                    self.fan_out(),
                    tiers
                        .into_iter()
                        .map(|tier| self.tier_status(region, item, prof, tier.id)),
                )
                .await;

                let mut status = CraftingStatus::not_craftable();
                for found in collapse_errors(results)? {
                    status.absorb(found);
                }
                Ok(status)
            })
            .await
    }

    pub(crate) fn tier_selected(&self, tier_name: &str) -> bool {
        self.cfg
            .tier_filter
            .as_deref()
            .is_none_or(|fragment| tier_name.contains(fragment))
    }

    fn skips_recipe(&self, recipe_name: &str) -> bool {
        self.cfg
            .skipped_recipe_fragments
            .iter()
            .any(|fragment| recipe_name.contains(fragment.as_str()))
    }

    async fn tier_status(
        &self,
        region: Region,
        item: &ItemDetail,
        prof: &Profession,
        tier: u32,
    ) -> Result<CraftingStatus, CpcError> {
        let tier = self.catalog.skill_tier(region, prof.id, tier).await?;
        let mut status = CraftingStatus::not_craftable();

        for category in &tier.categories {
            for entry in &category.recipes {
                if self.skips_recipe(&entry.name) {
                    continue;
                }
                let recipe = self.catalog.recipe(region, entry.id).await?;
                let crafts = recipe.crafts(item.id)
                    || self
                        .enchant_matches(region, item, &tier, category, &recipe.name)
                        .await?;
                if crafts {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        recipe = recipe.id,
                        profession = %prof.name,
                        tier = tier.id,
                        "found recipe"
                    );
                    status.push(RecipeRef {
                        recipe_id: recipe.id,
                        profession: prof.name.clone(),
                        profession_id: prof.id,
                        skill_tier: tier.id,
                    });
                }
            }
        }
        Ok(status)
    }

    /// Enchanting recipes carry no crafted item; the scroll they make is
    /// found by its conventional name instead.
    async fn enchant_matches(
        &self,
        region: Region,
        item: &ItemDetail,
        tier: &SkillTier,
        category: &RecipeCategory,
        recipe_name: &str,
    ) -> Result<bool, CpcError> {
        if !item.name.starts_with(ENCHANT_PREFIX) || !tier.name.contains(ENCHANTING_TIER) {
            return Ok(false);
        }
        let Some(slot) = slot_name(&category.name) else {
            return Ok(false);
        };
        let synthetic = format!("{ENCHANT_PREFIX}{slot} - {recipe_name}");
        match self.catalog.item_id(region, &synthetic).await {
            Ok(id) => Ok(id == item.id),
            Err(CpcError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

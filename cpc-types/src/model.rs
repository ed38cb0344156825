//! Priced recipe trees, crafting status and shopping list types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Numeric item identity.
pub type ItemId = u32;
/// Numeric recipe identity.
pub type RecipeId = u32;
/// Bonus ("variant") identifier carried on auction listings.
pub type BonusId = u32;
/// Connected realm identity.
pub type ConnectedRealmId = u32;

/// Auction price distribution for one item (optionally one variant).
///
/// Prices are in copper. An empty summary has `total_sales == 0` and zeroed
/// prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    /// Highest listing price.
    pub high: f64,
    /// Lowest listing price.
    pub low: f64,
    /// Volume-weighted average price.
    pub average: f64,
    /// Total matched quantity.
    pub total_sales: u64,
}

impl PriceSummary {
    /// True when no listing matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_sales == 0
    }

    /// Prices multiplied by `quantity`; the sales volume is unchanged.
    #[must_use]
    pub fn scaled(&self, quantity: f64) -> Self {
        Self {
            high: self.high * quantity,
            low: self.low * quantity,
            average: self.average * quantity,
            total_sales: self.total_sales,
        }
    }
}

/// Price of a non-craftable item at a specific variant item level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusPrice {
    /// Effective item level (base level plus the bonus delta).
    pub level: u32,
    /// Bonus id the listings were filtered by.
    pub bonus: BonusId,
    /// Auction prices for listings carrying `bonus`.
    pub price: PriceSummary,
}

/// A recipe able to craft an item, and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRef {
    /// Recipe id.
    pub recipe_id: RecipeId,
    /// Name of the profession owning the recipe.
    pub profession: String,
    /// Profession id.
    pub profession_id: u32,
    /// Skill tier the recipe belongs to.
    pub skill_tier: u32,
}

/// Whether an item can be crafted by a profession set, and with which recipes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingStatus {
    /// True when at least one recipe crafts the item.
    pub craftable: bool,
    /// Qualifying recipe ids in discovery order.
    pub recipe_ids: Vec<RecipeId>,
    /// Recipe to profession mapping, parallel to `recipe_ids`.
    pub recipes: Vec<RecipeRef>,
}

impl CraftingStatus {
    /// Status of an item nothing can craft.
    #[must_use]
    pub fn not_craftable() -> Self {
        Self::default()
    }

    /// Record a qualifying recipe.
    pub fn push(&mut self, recipe: RecipeRef) {
        self.recipe_ids.push(recipe.recipe_id);
        self.recipes.push(recipe);
        self.craftable = true;
    }

    /// Union another status into this one.
    pub fn absorb(&mut self, other: Self) {
        self.craftable |= other.craftable;
        self.recipe_ids.extend(other.recipe_ids);
        self.recipes.extend(other.recipes);
    }

    /// Position of a recipe in `recipe_ids`.
    #[must_use]
    pub fn recipe_index(&self, recipe_id: RecipeId) -> Option<usize> {
        self.recipe_ids.iter().position(|&id| id == recipe_id)
    }
}

/// Quantity range a single craft produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeOutput {
    /// Minimum produced per craft.
    pub min: f64,
    /// Maximum produced per craft.
    pub max: f64,
    /// Nominal quantity reported upstream.
    pub value: f64,
}

/// Cost to craft through one recipe option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeCost {
    /// Upper bound across all component prices.
    pub high: f64,
    /// Lower bound across all component prices.
    pub low: f64,
    /// Average-based estimate.
    pub average: f64,
}

/// One way of crafting a node, with its priced reagents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeOption {
    /// Recipe id.
    pub recipe_id: RecipeId,
    /// Recipe display name.
    pub recipe_name: String,
    /// Profession executing the recipe.
    pub profession: String,
    /// Crafting rank (effective item level) this option produces; 0 when unranked.
    pub rank: u32,
    /// Quantity produced per craft.
    pub output: RecipeOutput,
    /// Auction prices for the crafted item at this rank, when a variant maps to it.
    pub rank_price: Option<PriceSummary>,
    /// Rolled-up reagent cost.
    pub cost: RecipeCost,
    /// Priced reagents, in recipe order.
    pub parts: Vec<ProfitNode>,
}

/// A priced node of the recipe tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitNode {
    /// Item id.
    pub item_id: ItemId,
    /// Item display name.
    pub item_name: String,
    /// Units needed.
    pub quantity: f64,
    /// Base item level.
    pub base_level: u32,
    /// Vendor price per unit, when the item is sold by vendors and not crafted.
    pub vendor_price: Option<f64>,
    /// Auction prices across all variants.
    pub ah_price: PriceSummary,
    /// Auction prices per variant level for non-craftable items.
    pub bonus_prices: Vec<BonusPrice>,
    /// True iff `recipes` is non-empty.
    pub craftable: bool,
    /// Ways to craft this item.
    pub recipes: Vec<RecipeOption>,
}

impl ProfitNode {
    /// Distinct ranks among this node's recipe options, ascending.
    #[must_use]
    pub fn ranks(&self) -> Vec<u32> {
        let mut ranks: Vec<u32> = self.recipes.iter().map(|r| r.rank).collect();
        ranks.sort_unstable();
        ranks.dedup();
        ranks
    }
}

/// One side of a cyclic recipe pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSide {
    /// Recipe id.
    pub recipe_id: RecipeId,
    /// Items the recipe crafts.
    pub outputs: Vec<ItemId>,
    /// The recipe's single reagent.
    pub reagent: ItemId,
    /// Units of `reagent` consumed per craft.
    pub reagent_quantity: u32,
}

/// Two recipes that convert each other's output back and forth.
///
/// `first.recipe_id < second.recipe_id` always holds, so the same pair is
/// reported identically regardless of discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclicLink {
    /// Lower recipe id side.
    pub first: LinkSide,
    /// Higher recipe id side.
    pub second: LinkSide,
}

impl CyclicLink {
    /// Build a link from two sides in any order.
    #[must_use]
    pub fn new(a: LinkSide, b: LinkSide) -> Self {
        if a.recipe_id <= b.recipe_id {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }
}

/// A conversion edge from an item to its cyclic partner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkEdge {
    /// Item on the other side of the cycle.
    pub partner: ItemId,
    /// Units of `partner` consumed to craft this item.
    pub takes: f64,
    /// Units of this item consumed to craft `partner`.
    pub makes: f64,
}

/// Lookup of cyclic edges keyed by item id, filled in both directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CyclicLinkTable {
    edges: BTreeMap<ItemId, Vec<LinkEdge>>,
}

impl CyclicLinkTable {
    /// Build the lookup from detected links.
    #[must_use]
    pub fn from_links<'a, I>(links: I) -> Self
    where
        I: IntoIterator<Item = &'a CyclicLink>,
    {
        let mut table = Self::default();
        for link in links {
            table.insert(link);
        }
        table
    }

    /// Add both directions of a link.
    pub fn insert(&mut self, link: &CyclicLink) {
        self.insert_side(&link.first, &link.second);
        self.insert_side(&link.second, &link.first);
    }

    fn insert_side(&mut self, side: &LinkSide, other: &LinkSide) {
        for &item in &side.outputs {
            let edges = self.edges.entry(item).or_default();
            for &partner in &other.outputs {
                if partner == item || edges.iter().any(|e| e.partner == partner) {
                    continue;
                }
                edges.push(LinkEdge {
                    partner,
                    takes: f64::from(side.reagent_quantity),
                    makes: f64::from(other.reagent_quantity),
                });
            }
        }
    }

    /// True when `item` takes part in any cycle.
    #[must_use]
    pub fn contains(&self, item: ItemId) -> bool {
        self.edges.get(&item).is_some_and(|e| !e.is_empty())
    }

    /// Edges leaving `item`.
    #[must_use]
    pub fn edges(&self, item: ItemId) -> &[LinkEdge] {
        self.edges.get(&item).map_or(&[], Vec::as_slice)
    }

    /// Number of items taking part in cycles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when no cycles were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Cost of a shopping list entry at its net quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCost {
    /// Vendor cost, when vendor-sold.
    pub vendor: Option<f64>,
    /// Auction cost, when listings exist.
    pub ah: Option<PriceSummary>,
}

/// One material still to acquire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    /// Item id.
    pub item_id: ItemId,
    /// Item display name.
    pub name: String,
    /// Units to buy after deducting inventory.
    pub quantity: f64,
    /// Cost of `quantity` units.
    pub cost: ShoppingCost,
}

/// Shopping lists keyed by crafting rank.
pub type ShoppingLists = BTreeMap<u32, Vec<ShoppingListEntry>>;

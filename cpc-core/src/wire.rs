//! Response shapes of the game-data service.
//!
//! Only the fields the calculator reads are modelled; everything else in the
//! payloads is ignored. Optional or frequently absent fields default.

use cpc_types::{BonusId, ConnectedRealmId, ItemId, RecipeId};
use serde::{Deserialize, Serialize};

/// Localized string; only the `en_US` entry is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    /// English (US) text.
    #[serde(rename = "en_US", default)]
    pub en_us: String,
}

/// One page of `/data/wow/search/item`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearchPage {
    /// Total pages available.
    #[serde(default)]
    pub page_count: u32,
    /// Page number of this response.
    #[serde(default)]
    pub page: u32,
    /// Results per page.
    #[serde(default)]
    pub page_size: u32,
    /// Matches on this page.
    #[serde(default)]
    pub results: Vec<ItemSearchResult>,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSearchResult {
    /// Hit payload.
    pub data: ItemSearchData,
}

/// Fields of a search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSearchData {
    /// Item name.
    #[serde(default)]
    pub name: LocalizedName,
    /// Item id.
    pub id: ItemId,
}

/// Link to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Href {
    /// Absolute URL.
    pub href: String,
}

/// `/data/wow/connected-realm/index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedRealmIndex {
    /// Links to every connected realm of the region.
    #[serde(default)]
    pub connected_realms: Vec<Href>,
}

/// A connected realm and its member realms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedRealm {
    /// Connected realm id.
    pub id: ConnectedRealmId,
    /// Member realms.
    #[serde(default)]
    pub realms: Vec<RealmEntry>,
}

/// A member realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmEntry {
    /// Realm display name.
    pub name: String,
}

/// `/data/wow/item/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    /// Item id.
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Free-text description; mentions "vendor" for vendor goods.
    #[serde(default)]
    pub description: String,
    /// Vendor price for one purchase batch.
    #[serde(default)]
    pub purchase_price: u64,
    /// Units in one purchase batch.
    #[serde(default)]
    pub purchase_quantity: u64,
    /// Base item level.
    #[serde(default)]
    pub level: u32,
}

impl ItemDetail {
    /// True when the description marks the item as bought from vendors.
    #[must_use]
    pub fn mentions_vendor(&self) -> bool {
        self.description.contains("vendor")
    }

    /// Vendor price per unit, when the item is vendor-sold.
    ///
    /// An item counts as vendor-sold when its description is empty, mentions
    /// "vendor", or does not mention "auction".
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn vendor_unit_price(&self) -> Option<f64> {
        let d = &self.description;
        let vendor_sold = d.is_empty() || d.contains("vendor") || !d.contains("auction");
        if !vendor_sold {
            return None;
        }
        let price = self.purchase_price as f64;
        if self.purchase_quantity == 0 {
            Some(price)
        } else {
            Some(price / self.purchase_quantity as f64)
        }
    }
}

/// Reference to a profession, skill tier or recipe by name and id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Display name.
    pub name: String,
    /// Numeric id.
    pub id: u32,
}

/// `/data/wow/profession/index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionIndex {
    /// Every profession of the region.
    #[serde(default)]
    pub professions: Vec<NamedRef>,
}

/// `/data/wow/profession/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    /// Profession id.
    pub id: u32,
    /// Profession name.
    pub name: String,
    /// Expansion-specific skill tiers.
    #[serde(default)]
    pub skill_tiers: Vec<NamedRef>,
}

/// `/data/wow/profession/{id}/skill-tier/{tier}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTier {
    /// Tier id; absent in some payloads.
    #[serde(default)]
    pub id: u32,
    /// Tier name.
    #[serde(default)]
    pub name: String,
    /// Recipe categories.
    #[serde(default)]
    pub categories: Vec<RecipeCategory>,
}

/// A category of a skill tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCategory {
    /// Category name, e.g. "Ring Enchantments".
    #[serde(default)]
    pub name: String,
    /// Recipes in the category.
    #[serde(default)]
    pub recipes: Vec<NamedRef>,
}

/// Reference by id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    /// Numeric id.
    pub id: u32,
}

/// A reagent line of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReagentLine {
    /// Reagent item.
    pub reagent: IdRef,
    /// Units consumed per craft.
    pub quantity: u32,
}

/// Output quantity of a recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftedQuantity {
    /// Minimum produced.
    #[serde(default)]
    pub minimum: u32,
    /// Maximum produced.
    #[serde(default)]
    pub maximum: u32,
    /// Nominal value.
    #[serde(default)]
    pub value: u32,
}

/// `/data/wow/recipe/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Recipe id.
    pub id: RecipeId,
    /// Recipe name.
    pub name: String,
    /// Output for both factions.
    #[serde(default)]
    pub crafted_item: Option<IdRef>,
    /// Alliance-only output.
    #[serde(default)]
    pub alliance_crafted_item: Option<IdRef>,
    /// Horde-only output.
    #[serde(default)]
    pub horde_crafted_item: Option<IdRef>,
    /// Reagents consumed per craft.
    #[serde(default)]
    pub reagents: Vec<ReagentLine>,
    /// Output quantity range.
    #[serde(default)]
    pub crafted_quantity: CraftedQuantity,
}

impl RecipeDetail {
    /// Union of the faction-neutral and faction-specific outputs, deduplicated.
    #[must_use]
    pub fn crafted_ids(&self) -> Vec<ItemId> {
        let mut ids = Vec::with_capacity(3);
        for r in [
            self.crafted_item,
            self.horde_crafted_item,
            self.alliance_crafted_item,
        ]
        .into_iter()
        .flatten()
        {
            if !ids.contains(&r.id) {
                ids.push(r.id);
            }
        }
        ids
    }

    /// True when the recipe produces `item`.
    #[must_use]
    pub fn crafts(&self, item: ItemId) -> bool {
        self.crafted_ids().contains(&item)
    }
}

/// `/data/wow/connected-realm/{id}/auctions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    /// Every listing of the connected realm.
    #[serde(default)]
    pub auctions: Vec<AuctionListing>,
}

/// One auction listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionListing {
    /// Listed item and its variant tags.
    pub item: AuctionItem,
    /// Units listed.
    #[serde(default)]
    pub quantity: u64,
    /// Buyout price for the whole listing; 0 or absent for commodities.
    #[serde(default)]
    pub buyout: u64,
    /// Per-unit price for commodities.
    #[serde(default)]
    pub unit_price: u64,
}

/// Item reference on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionItem {
    /// Item id.
    pub id: ItemId,
    /// Bonus ids describing the variant.
    #[serde(default)]
    pub bonus_lists: Vec<BonusId>,
}

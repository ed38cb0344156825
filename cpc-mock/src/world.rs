use std::collections::{BTreeMap, HashMap};

use cpc_core::wire::{
    AuctionItem, AuctionListing, AuctionSnapshot, ConnectedRealm, ConnectedRealmIndex,
    CraftedQuantity, Href, IdRef, ItemDetail, ItemSearchData, ItemSearchPage, ItemSearchResult,
    LocalizedName, NamedRef, Profession, ProfessionIndex, ReagentLine, RecipeCategory,
    RecipeDetail, RealmEntry, SkillTier,
};
use cpc_core::{BonusId, ConnectedRealmId, ItemId, RecipeId};
use serde_json::{Value, json};

/// Host used for connected-realm links handed out by the mock index.
pub const REALM_HREF_BASE: &str = "https://mock.api/data/wow/connected-realm/";

/// Description given to items that are only sold on the auction house.
pub const AUCTION_DESCRIPTION: &str = "Player crafted, traded on the auction house.";

/// Description given to vendor goods.
pub const VENDOR_DESCRIPTION: &str = "Sold by a vendor.";

/// A static game world served by [`MockGameData`](crate::MockGameData).
///
/// The same world answers for every region.
#[derive(Debug, Clone, Default)]
pub struct MockWorld {
    pub(crate) items: BTreeMap<ItemId, ItemDetail>,
    pub(crate) recipes: HashMap<RecipeId, RecipeDetail>,
    pub(crate) professions: BTreeMap<u32, Profession>,
    pub(crate) tiers: HashMap<(u32, u32), SkillTier>,
    pub(crate) realms: BTreeMap<ConnectedRealmId, ConnectedRealm>,
    pub(crate) auctions: HashMap<ConnectedRealmId, Vec<AuctionListing>>,
}

impl MockWorld {
    /// Empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item traded on the auction house.
    #[must_use]
    pub fn item(self, id: ItemId, name: &str) -> Self {
        self.item_detail(ItemDetail {
            id,
            name: name.to_string(),
            description: AUCTION_DESCRIPTION.to_string(),
            purchase_price: 0,
            purchase_quantity: 0,
            level: 0,
        })
    }

    /// Add a vendor item costing `price` per batch of `batch` units.
    #[must_use]
    pub fn vendor_item(self, id: ItemId, name: &str, price: u64, batch: u64) -> Self {
        self.item_detail(ItemDetail {
            id,
            name: name.to_string(),
            description: VENDOR_DESCRIPTION.to_string(),
            purchase_price: price,
            purchase_quantity: batch,
            level: 0,
        })
    }

    /// Add or replace an item with full control over its fields.
    #[must_use]
    pub fn item_detail(mut self, detail: ItemDetail) -> Self {
        self.items.insert(detail.id, detail);
        self
    }

    /// Set the base item level of an existing item.
    #[must_use]
    pub fn item_level(mut self, id: ItemId, level: u32) -> Self {
        if let Some(item) = self.items.get_mut(&id) {
            item.level = level;
        }
        self
    }

    /// Add a profession without skill tiers.
    #[must_use]
    pub fn profession(mut self, id: u32, name: &str) -> Self {
        self.professions.entry(id).or_insert_with(|| Profession {
            id,
            name: name.to_string(),
            skill_tiers: Vec::new(),
        });
        self
    }

    /// Add a skill tier to a profession, creating the profession if needed.
    ///
    /// `categories` lists `(category name, recipe ids)`; recipe names are taken
    /// from recipes already registered with [`recipe`](Self::recipe) and
    /// default to `Recipe {id}`.
    #[must_use]
    pub fn skill_tier(
        mut self,
        profession: u32,
        tier: u32,
        name: &str,
        categories: &[(&str, &[RecipeId])],
    ) -> Self {
        let prof = self.professions.entry(profession).or_insert_with(|| Profession {
            id: profession,
            name: format!("Profession {profession}"),
            skill_tiers: Vec::new(),
        });
        if !prof.skill_tiers.iter().any(|t| t.id == tier) {
            prof.skill_tiers.push(NamedRef {
                name: name.to_string(),
                id: tier,
            });
        }
        let categories = categories
            .iter()
            .map(|(cat, ids)| RecipeCategory {
                name: (*cat).to_string(),
                recipes: ids
                    .iter()
                    .map(|id| NamedRef {
                        name: self
                            .recipes
                            .get(id)
                            .map_or_else(|| format!("Recipe {id}"), |r| r.name.clone()),
                        id: *id,
                    })
                    .collect(),
            })
            .collect();
        self.tiers.insert(
            (profession, tier),
            SkillTier {
                id: tier,
                name: name.to_string(),
                categories,
            },
        );
        self
    }

    /// Add a recipe crafting `output` from `reagents`, yielding between
    /// `min` and `max` units per craft.
    #[must_use]
    pub fn recipe(
        self,
        id: RecipeId,
        name: &str,
        output: ItemId,
        reagents: &[(ItemId, u32)],
        (min, max): (u32, u32),
    ) -> Self {
        self.recipe_detail(RecipeDetail {
            id,
            name: name.to_string(),
            crafted_item: Some(IdRef { id: output }),
            alliance_crafted_item: None,
            horde_crafted_item: None,
            reagents: reagents
                .iter()
                .map(|&(item, quantity)| ReagentLine {
                    reagent: IdRef { id: item },
                    quantity,
                })
                .collect(),
            crafted_quantity: CraftedQuantity {
                minimum: min,
                maximum: max,
                value: 0,
            },
        })
    }

    /// Add or replace a recipe with full control over its fields.
    #[must_use]
    pub fn recipe_detail(mut self, detail: RecipeDetail) -> Self {
        self.recipes.insert(detail.id, detail);
        self
    }

    /// Add a connected realm grouping the named realms.
    #[must_use]
    pub fn connected_realm(mut self, id: ConnectedRealmId, realms: &[&str]) -> Self {
        self.realms.insert(
            id,
            ConnectedRealm {
                id,
                realms: realms
                    .iter()
                    .map(|n| RealmEntry {
                        name: (*n).to_string(),
                    })
                    .collect(),
            },
        );
        self
    }

    /// Add a commodity listing priced per unit.
    #[must_use]
    pub fn listing(
        self,
        realm: ConnectedRealmId,
        item: ItemId,
        quantity: u64,
        unit_price: u64,
    ) -> Self {
        self.listing_with_bonuses(realm, item, &[], quantity, unit_price)
    }

    /// Add a listing for a variant carrying `bonuses`.
    #[must_use]
    pub fn listing_with_bonuses(
        mut self,
        realm: ConnectedRealmId,
        item: ItemId,
        bonuses: &[BonusId],
        quantity: u64,
        unit_price: u64,
    ) -> Self {
        self.auctions.entry(realm).or_default().push(AuctionListing {
            item: AuctionItem {
                id: item,
                bonus_lists: bonuses.to_vec(),
            },
            quantity,
            buyout: 0,
            unit_price,
        });
        self
    }

    /// Answer a request path (or absolute link) the way the live service would.
    ///
    /// Unknown resources produce the service's JSON not-found body rather
    /// than a transport failure.
    pub(crate) fn answer(&self, target: &str, query: &[(String, String)]) -> Value {
        let param = |key: &str| query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
        let ok = |v: Result<Value, serde_json::Error>| v.unwrap_or_else(|_| not_found_body());

        if let Some(id) = target.strip_prefix(REALM_HREF_BASE) {
            return id
                .parse::<ConnectedRealmId>()
                .ok()
                .and_then(|id| self.realms.get(&id))
                .map_or_else(not_found_body, |r| ok(serde_json::to_value(r)));
        }

        let segments: Vec<&str> = target
            .trim_start_matches("/data/wow/")
            .split('/')
            .collect();
        match segments.as_slice() {
            ["search", "item"] => {
                let name = param("name.en_US").unwrap_or_default();
                let page = param("_page").and_then(|p| p.parse().ok()).unwrap_or(1);
                ok(serde_json::to_value(self.search(name, page)))
            }
            ["connected-realm", "index"] => ok(serde_json::to_value(ConnectedRealmIndex {
                connected_realms: self
                    .realms
                    .keys()
                    .map(|id| Href {
                        href: format!("{REALM_HREF_BASE}{id}"),
                    })
                    .collect(),
            })),
            ["connected-realm", id, "auctions"] => match id.parse::<ConnectedRealmId>() {
                Ok(id) if self.realms.contains_key(&id) => ok(serde_json::to_value(AuctionSnapshot {
                    auctions: self.auctions.get(&id).cloned().unwrap_or_default(),
                })),
                _ => not_found_body(),
            },
            ["item", id] => lookup(&self.items, id),
            ["recipe", id] => id
                .parse::<RecipeId>()
                .ok()
                .and_then(|id| self.recipes.get(&id))
                .map_or_else(not_found_body, |r| ok(serde_json::to_value(r))),
            ["profession", "index"] => ok(serde_json::to_value(ProfessionIndex {
                professions: self
                    .professions
                    .values()
                    .map(|p| NamedRef {
                        name: p.name.clone(),
                        id: p.id,
                    })
                    .collect(),
            })),
            ["profession", id] => lookup(&self.professions, id),
            ["profession", prof, "skill-tier", tier] => match (prof.parse(), tier.parse()) {
                (Ok(p), Ok(t)) => self
                    .tiers
                    .get(&(p, t))
                    .map_or_else(not_found_body, |s| ok(serde_json::to_value(s))),
                _ => not_found_body(),
            },
            _ => not_found_body(),
        }
    }

    fn search(&self, name: &str, page: u32) -> ItemSearchPage {
        let needle = name.to_lowercase();
        let mut hits: Vec<&ItemDetail> = self
            .items
            .values()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect();
        hits.sort_by(|a, b| b.id.cmp(&a.id));
        ItemSearchPage {
            page_count: u32::from(!hits.is_empty()),
            page,
            page_size: 1000,
            results: if page <= 1 {
                hits.into_iter()
                    .map(|i| ItemSearchResult {
                        data: ItemSearchData {
                            name: LocalizedName {
                                en_us: i.name.clone(),
                            },
                            id: i.id,
                        },
                    })
                    .collect()
            } else {
                Vec::new()
            },
        }
    }
}

fn lookup<T: serde::Serialize>(map: &BTreeMap<u32, T>, id: &str) -> Value {
    id.parse::<u32>()
        .ok()
        .and_then(|id| map.get(&id))
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or_else(not_found_body)
}

/// Body the live service returns for a missing resource.
#[must_use]
pub fn not_found_body() -> Value {
    json!({ "code": 404, "type": "BLZWEBAPI00000404", "detail": "Not Found" })
}

//! Ready-made worlds.
//!
//! Every world contains the realms below and the professions its recipes
//! need. [`demo_world`] combines all of them.

use std::collections::HashMap;

use cpc_core::wire::{CraftedQuantity, IdRef, ReagentLine, RecipeDetail};
use cpc_core::{
    BonusInfo, ConnectedRealmId, ItemId, RankMappings, RecipeId, Region, ShoppingExclusions,
    StaticSources,
};

use crate::MockWorld;

/// Region the fixtures are written for (the mock answers for any region).
pub const REGION: Region = Region::Us;
/// Realm holding every fixture listing.
pub const REALM: &str = "Hyjal";
/// Connected realm of [`REALM`].
pub const REALM_ID: ConnectedRealmId = 12;
/// A second connected realm without listings.
pub const OTHER_REALM_ID: ConnectedRealmId = 11;

/// Tailoring profession id.
pub const TAILORING: u32 = 197;
/// Tailoring skill tier used by the fixtures.
pub const TAILORING_TIER: u32 = 2831;
/// Alchemy profession id.
pub const ALCHEMY: u32 = 171;
/// Alchemy skill tier used by the fixtures.
pub const ALCHEMY_TIER: u32 = 2823;
/// Enchanting profession id.
pub const ENCHANTING: u32 = 333;
/// Enchanting skill tier used by the fixtures.
pub const ENCHANTING_TIER: u32 = 2825;

/// Vendor thread: 5 copper per batch of 5.
pub const THREAD: ItemId = 1000;

/// Crafted cloth bolt.
pub const BOLT: ItemId = 2000;
/// First bolt reagent, two per craft.
pub const CLOTH: ItemId = 2001;
/// Second bolt reagent, three per craft.
pub const VIBRANT_CLOTH: ItemId = 2002;
/// Bolt recipe, producing exactly three per craft.
pub const BOLT_RECIPE: RecipeId = 3000;

/// First item of the cyclic ore pair.
pub const BLESSED_ORE: ItemId = 4001;
/// Second item of the cyclic ore pair.
pub const REFINED_ORE: ItemId = 4002;
/// Consumes one blessed ore, yields one refined ore.
pub const REFINE_RECIPE: RecipeId = 5001;
/// Consumes one refined ore, yields one blessed ore.
pub const BREAK_DOWN_RECIPE: RecipeId = 5002;

/// Enchantment scroll; no recipe names it as output.
pub const RING_ENCHANT: ItemId = 6100;
/// Dust consumed by the enchantment.
pub const DUST: ItemId = 6200;
/// Enchantment recipe.
pub const RING_ENCHANT_RECIPE: RecipeId = 6001;
/// Name of the enchantment recipe.
pub const RING_ENCHANT_RECIPE_NAME: &str = "Devotion of Critical Strike";

/// Gloves crafted at two ranks.
pub const GLOVES: ItemId = 7000;
/// Spark reagent of the higher-rank glove recipe.
pub const SPARK: ItemId = 7100;
/// Lower-rank glove recipe.
pub const GLOVES_RECIPE: RecipeId = 7001;
/// Higher-rank glove recipe.
pub const GLOVES_RECIPE_HIGH: RecipeId = 7002;
/// Base item level of the gloves.
pub const GLOVES_LEVEL: u32 = 333;
/// Bonus lifting the gloves by 13 levels.
pub const BONUS_LOW: u32 = 8840;
/// Bonus lifting the gloves by 26 levels.
pub const BONUS_HIGH: u32 = 8841;
/// Bonus without a level change.
pub const BONUS_FLAT: u32 = 8842;

fn base() -> MockWorld {
    MockWorld::new()
        .connected_realm(OTHER_REALM_ID, &["Stormrage"])
        .connected_realm(REALM_ID, &[REALM, "Area 52"])
        .profession(TAILORING, "Tailoring")
        .profession(ALCHEMY, "Alchemy")
        .profession(ENCHANTING, "Enchanting")
}

fn add_vendor_item(w: MockWorld) -> MockWorld {
    w.vendor_item(THREAD, "Spool of Thread", 5, 5)
}

fn add_bolt(w: MockWorld) -> MockWorld {
    w.item(BOLT, "Wildercloth Bolt")
        .item(CLOTH, "Wildercloth")
        .item(VIBRANT_CLOTH, "Vibrant Wildercloth")
        .recipe(
            BOLT_RECIPE,
            "Wildercloth Bolt",
            BOLT,
            &[(CLOTH, 2), (VIBRANT_CLOTH, 3)],
            (3, 3),
        )
        .listing(REALM_ID, BOLT, 10, 400)
        .listing(REALM_ID, CLOTH, 100, 20)
        .listing(REALM_ID, VIBRANT_CLOTH, 100, 50)
        .listing(REALM_ID, VIBRANT_CLOTH, 50, 60)
}

fn add_cyclic_ore(w: MockWorld) -> MockWorld {
    w.item(BLESSED_ORE, "Blessed Ore")
        .item(REFINED_ORE, "Refined Ore")
        .recipe(REFINE_RECIPE, "Refine Ore", REFINED_ORE, &[(BLESSED_ORE, 1)], (1, 1))
        .recipe(BREAK_DOWN_RECIPE, "Break Down Ore", BLESSED_ORE, &[(REFINED_ORE, 1)], (1, 1))
        .listing(REALM_ID, BLESSED_ORE, 20, 100)
        .listing(REALM_ID, REFINED_ORE, 20, 120)
}

fn add_enchant(w: MockWorld) -> MockWorld {
    w.item(RING_ENCHANT, "Enchant Ring - Devotion of Critical Strike")
        .item(DUST, "Chromatic Dust")
        .recipe_detail(RecipeDetail {
            id: RING_ENCHANT_RECIPE,
            name: RING_ENCHANT_RECIPE_NAME.to_string(),
            crafted_item: None,
            alliance_crafted_item: None,
            horde_crafted_item: None,
            reagents: vec![ReagentLine {
                reagent: IdRef { id: DUST },
                quantity: 3,
            }],
            crafted_quantity: CraftedQuantity {
                minimum: 1,
                maximum: 1,
                value: 1,
            },
        })
        .listing(REALM_ID, RING_ENCHANT, 5, 3000)
        .listing(REALM_ID, DUST, 200, 15)
}

fn add_gloves(w: MockWorld) -> MockWorld {
    w.item(GLOVES, "Crimson Combatant's Wildercloth Gloves")
        .item_level(GLOVES, GLOVES_LEVEL)
        .item(SPARK, "Spark of Ingenuity")
        .recipe(
            GLOVES_RECIPE,
            "Crimson Combatant's Wildercloth Gloves",
            GLOVES,
            &[(BOLT, 3), (THREAD, 2)],
            (1, 1),
        )
        .recipe(
            GLOVES_RECIPE_HIGH,
            "Crimson Combatant's Wildercloth Gloves (Inspired)",
            GLOVES,
            &[(BOLT, 3), (SPARK, 1)],
            (1, 1),
        )
        .listing(REALM_ID, GLOVES, 2, 8_000)
        .listing_with_bonuses(REALM_ID, GLOVES, &[BONUS_LOW], 3, 10_000)
        .listing_with_bonuses(REALM_ID, GLOVES, &[BONUS_HIGH, BONUS_FLAT], 1, 15_000)
        .listing(REALM_ID, SPARK, 4, 2_500)
}

fn with_tiers(
    w: MockWorld,
    tailoring: &[RecipeId],
    alchemy: &[RecipeId],
    enchanting: &[RecipeId],
) -> MockWorld {
    w.skill_tier(TAILORING, TAILORING_TIER, "Dragon Isles Tailoring", &[("Cloth", tailoring)])
        .skill_tier(ALCHEMY, ALCHEMY_TIER, "Dragon Isles Alchemy", &[("Transmutes", alchemy)])
        .skill_tier(
            ENCHANTING,
            ENCHANTING_TIER,
            "Dragon Isles Enchanting",
            &[("Ring Enchantments", enchanting)],
        )
}

/// A vendor-only item nobody crafts.
#[must_use]
pub fn vendor_world() -> MockWorld {
    with_tiers(add_vendor_item(base()), &[], &[], &[])
}

/// A bolt crafted from two cloth reagents, three per craft.
#[must_use]
pub fn bolt_world() -> MockWorld {
    with_tiers(add_bolt(base()), &[BOLT_RECIPE], &[], &[])
}

/// Two alchemy recipes turning ores into each other.
#[must_use]
pub fn cyclic_world() -> MockWorld {
    with_tiers(
        add_cyclic_ore(base()),
        &[],
        &[REFINE_RECIPE, BREAK_DOWN_RECIPE],
        &[],
    )
}

/// An enchantment only reachable through its synthetic scroll name.
#[must_use]
pub fn enchant_world() -> MockWorld {
    with_tiers(add_enchant(base()), &[], &[], &[RING_ENCHANT_RECIPE])
}

/// Every fixture together, plus ranked gloves built on the bolt.
#[must_use]
pub fn demo_world() -> MockWorld {
    let w = add_gloves(add_enchant(add_cyclic_ore(add_bolt(add_vendor_item(base())))));
    with_tiers(
        w,
        &[BOLT_RECIPE, GLOVES_RECIPE, GLOVES_RECIPE_HIGH],
        &[REFINE_RECIPE, BREAK_DOWN_RECIPE],
        &[RING_ENCHANT_RECIPE],
    )
}

/// Reference tables matching [`demo_world`]: the two glove recipes map to
/// ranks 346 and 359.
#[must_use]
pub fn demo_static_sources() -> StaticSources {
    static_sources_excluding(&[])
}

/// Same as [`demo_static_sources`] with shopping-list exclusions.
#[must_use]
pub fn static_sources_excluding(recipes: &[RecipeId]) -> StaticSources {
    let bonus = |id: u32, level: i32| {
        (
            id,
            BonusInfo {
                id: i64::from(id),
                level,
                quality: 0,
                socket: 0,
            },
        )
    };
    let bonuses: HashMap<u32, BonusInfo> = [
        bonus(BONUS_LOW, 13),
        bonus(BONUS_HIGH, 26),
        bonus(BONUS_FLAT, 0),
    ]
        .into_iter()
        .collect();
    StaticSources::from_parts(
        bonuses,
        RankMappings {
            available_levels: vec![GLOVES_LEVEL + 13, GLOVES_LEVEL + 26],
            rank_mapping: vec![0, 1],
        },
        ShoppingExclusions {
            exclusions: recipes.to_vec(),
        },
    )
}

//! Data model, configuration primitives and the error type shared by every
//! crate of the crafting profit calculator.
#![warn(missing_docs)]

mod config;
mod error;
mod model;
mod region;
mod run_config;
mod set;

pub use config::{
    ApiCredentials, CpcConfig, RateLimitConfig, ResolverConfig, RetryConfig, TtlConfig, TtlPolicy,
    TtlTier,
};
pub use error::CpcError;
pub use model::{
    BonusId, BonusPrice, ConnectedRealmId, CraftingStatus, CyclicLink, CyclicLinkTable, ItemId,
    LinkEdge, LinkSide, PriceSummary, ProfitNode, RecipeCost, RecipeId, RecipeOption,
    RecipeOutput, RecipeRef, ShoppingCost, ShoppingListEntry, ShoppingLists,
};
pub use region::{Namespace, Region};
pub use run_config::{AddonData, AddonInventoryEntry, AddonRealm, ItemRef, RunConfiguration};
pub use set::OrderedSet;

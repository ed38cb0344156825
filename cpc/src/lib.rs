//! cpc prices crafted items from live auction data.
//!
//! Overview
//! - Resolves an item's recipes for a set of professions and recurses into every
//!   reagent, pricing each node from vendor prices and one auction snapshot.
//! - Detects recipe pairs that convert two items into each other and refuses to
//!   recurse into them instead of looping.
//! - Rolls reagent costs up into every recipe option and folds the tree into
//!   inventory-netted shopping lists, one per crafting rank.
//! - Talks to the game-data service through any `GameDataApi` stack; the usual
//!   stack is `cpc-blizzard` wrapped in the admission window and retry layers
//!   of `cpc-middleware`.
//!
//! Key behaviors and trade-offs
//! - Caching: item, recipe, profession and realm lookups are cached with
//!   jittered TTLs per tier; crafting statuses and cyclic links are cached as
//!   computed results. Auction snapshots are never cached.
//! - Concurrency: professions, skill tiers and reagents fan out with a small
//!   bound each (`ResolverConfig::fan_out`, 3 by default). The admission window
//!   is the only global limit on outgoing requests.
//! - Failure: any lookup error aborts the whole resolution; there are no
//!   partial trees. `run_job` folds the error into its response instead.
//! - Professions: an empty profession list means every profession of the region.
//!
//! Examples
//! Building a calculator over the HTTP connector:
//! ```rust,ignore
//! use cpc::{Calculator, ItemRef, Region};
//! use cpc_blizzard::BlizzardConnector;
//!
//! let calc = Calculator::builder()
//!     .with_api_builder(BlizzardConnector::rate_limited(credentials))
//!     .static_sources(cpc::StaticSources::load("static_files")?)
//!     .build()?;
//!
//! let tree = calc
//!     .resolve(
//!         Region::Us,
//!         "Hyjal",
//!         &["Alchemy".into()],
//!         &ItemRef::from("Potion of Spectral Strength"),
//!         5,
//!     )
//!     .await?;
//! ```
//!
//! Shopping lists against an addon export:
//! ```rust,ignore
//! let mut run = cpc::RunConfiguration::from_addon_data(&addon, "Potion of Spectral Strength", 5)?;
//! let tree = calc.resolve_run(&run).await?;
//! let lists = calc.shopping_lists(&tree, &mut run);
//! ```
//!
//! See `cpc/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod job;
mod resolver;
mod shopping;

pub use crate::core::{Calculator, CalculatorBuilder};
pub use job::{DetailFill, FailedItem, FilledItem, JobOutcome, JobRequest, JobResponse};
pub use resolver::{find_cyclic_links, recipe_cost, slot_name};
pub use shopping::build_shopping_lists;

pub use cpc_middleware::{AdmissionWindow, ApiBuilder, RateLimitMiddleware, RetryMiddleware};

// Re-export core types for convenience
pub use cpc_core::{
    AddonData,
    AddonInventoryEntry,
    ApiCredentials,
    BonusPrice,
    CacheStore,
    Catalog,
    CpcConfig,
    CpcError,
    CraftingStatus,
    CyclicLink,
    CyclicLinkTable,
    GameDataApi,
    ItemId,
    ItemRef,
    LinkEdge,
    PriceSummary,
    ProfitNode,
    RateLimitConfig,
    RecipeCost,
    RecipeId,
    RecipeOption,
    RecipeOutput,
    RecipeRef,
    Region,
    ResolverConfig,
    RetryConfig,
    RunConfiguration,
    ShoppingCost,
    ShoppingListEntry,
    ShoppingLists,
    StaticSources,
    TtlConfig,
};

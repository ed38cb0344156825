//! cpc-core
//!
//! Shared building blocks of the crafting profit calculator.
//!
//! - `connector`: the `GameDataApi` trait every connector and middleware implements.
//! - `cache`: namespaced JSON cache with jittered per-tier expirations.
//! - `oracle`: auction price summaries over one snapshot.
//! - `catalog`: cached, typed lookups against the game-data service.
//! - `static_data`: bonus, rank and exclusion tables.
//!
//! Async runtime (Tokio)
//! ---------------------
//! The in-memory cache measures expiry on the Tokio clock and all async APIs
//! expect to run under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Namespaced cache store and its backends.
pub mod cache;
/// Cached, typed lookups.
pub mod catalog;
/// Connector trait and request/response types.
pub mod connector;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Auction price summaries.
pub mod oracle;
/// Static reference tables.
pub mod static_data;
pub mod wire;

pub use cache::{CacheBackend, CacheNamespace, CacheStore, MemoryBackend};
pub use catalog::Catalog;
pub use connector::{ApiRequest, ApiResponse, ApiTarget, GameDataApi};
pub use cpc_types::*;
pub use middleware::Middleware;
pub use static_data::{BonusInfo, RankMappings, ShoppingExclusions, StaticSources};

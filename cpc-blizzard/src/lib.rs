//! cpc-blizzard
//!
//! HTTP connector implementing `GameDataApi` against the Battle.net game-data
//! service: per-region OAuth client-credentials tokens, regional hosts,
//! `locale`/`namespace` query parameters and bearer authorization. Wrap it
//! with [`BlizzardConnector::rate_limited`] to get the service quota and
//! transport retries from `cpc-middleware`.
#![warn(missing_docs)]

/// Token exchange and per-region token cache.
pub mod auth;
mod builder;
mod client;

pub use crate::auth::{AccessToken, OAuthTokenSource, TokenManager, TokenResponse, TokenSource};
pub use crate::builder::BlizzardApiBuilder;
pub use crate::client::{BlizzardConnector, LOCALE};

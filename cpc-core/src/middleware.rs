//! Layers that sit between the catalog and the game-data service.
//!
//! Each layer takes ownership of the connector below it and hands back a new
//! connector. The admission window wraps the retry loop, which wraps the raw
//! HTTP connector.

use std::sync::Arc;

use crate::connector::GameDataApi;

/// A wrapper around a [`GameDataApi`] connector, such as the admission
/// window or the transport retry loop.
pub trait Middleware: Send + Sync {
    /// Wrap `inner`, returning the connector the next layer out will call.
    fn apply(self: Box<Self>, inner: Arc<dyn GameDataApi>) -> Arc<dyn GameDataApi>;

    /// Layer name, e.g. `"RateLimitedApi"`; the builder replaces layers by it.
    fn name(&self) -> &'static str;

    /// Settings of this layer as JSON, so a built stack can be described.
    fn config_json(&self) -> serde_json::Value;
}

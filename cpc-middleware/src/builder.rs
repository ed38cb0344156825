//! Builder for composing a raw game-data connector with middleware layers.
//!
//! # Layer order
//!
//! Layers form an onion around the raw connector:
//!
//! ```text
//! Caller
//!     ↓
//! RateLimitedApi   (one admission per logical request)
//!     ↓
//! RetryingApi      (transport retries inside that admission)
//!     ↓
//! Raw connector    (HTTP)
//! ```
//!
//! The `layers` vector is stored outermost-first and applied in reverse by
//! [`ApiBuilder::build`]. The rate limit always sits at index 0 and retries
//! always sit directly above the raw connector, whichever order the builder
//! methods are called in. Custom layers added with [`ApiBuilder::layer`]
//! become the new outermost layer.

use std::sync::Arc;

use cpc_core::{GameDataApi, Middleware, RateLimitConfig, RetryConfig};
use serde_json::json;

use crate::rate_limit::{AdmissionWindow, RateLimitMiddleware};
use crate::retry::RetryMiddleware;

const RATE_LIMIT: &str = "RateLimitedApi";
const RETRY: &str = "RetryingApi";

/// Middleware builder for a [`GameDataApi`].
pub struct ApiBuilder {
    raw: Arc<dyn GameDataApi>,
    /// Layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
    window: Option<Arc<AdmissionWindow>>,
}

impl ApiBuilder {
    /// Start from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn GameDataApi>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
            window: None,
        }
    }

    /// Add or replace the admission window, creating a fresh one from `cfg`.
    #[must_use]
    pub fn with_rate_limit(self, cfg: RateLimitConfig) -> Self {
        self.with_window(Arc::new(AdmissionWindow::new(cfg)))
    }

    /// Add or replace the admission window with a shared one.
    #[must_use]
    pub fn with_window(mut self, window: Arc<AdmissionWindow>) -> Self {
        self.layers.retain(|m| m.name() != RATE_LIMIT);
        self.layers
            .insert(0, Box::new(RateLimitMiddleware::new(Arc::clone(&window))));
        self.window = Some(window);
        self
    }

    /// Remove the admission window if present.
    #[must_use]
    pub fn without_rate_limit(mut self) -> Self {
        self.layers.retain(|m| m.name() != RATE_LIMIT);
        self.window = None;
        self
    }

    /// Add or replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, cfg: RetryConfig) -> Self {
        self.layers.retain(|m| m.name() != RETRY);
        self.layers.push(Box::new(RetryMiddleware::new(cfg)));
        self
    }

    /// Remove retries if present.
    #[must_use]
    pub fn without_retry(mut self) -> Self {
        self.layers.retain(|m| m.name() != RETRY);
        self
    }

    /// Add an arbitrary layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// The admission window the built connector will use, if any.
    ///
    /// Keep a handle to it to stop the reset timer at shutdown.
    #[must_use]
    pub fn admission_window(&self) -> Option<Arc<AdmissionWindow>> {
        self.window.clone()
    }

    /// Layer names, outermost first, ending with the raw connector.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers
            .iter()
            .map(|m| m.name())
            .chain(std::iter::once(self.raw.name()))
            .collect()
    }

    /// Configuration snapshot of the stack, outermost first.
    #[must_use]
    pub fn describe(&self) -> serde_json::Value {
        let mut out: Vec<serde_json::Value> = self
            .layers
            .iter()
            .map(|m| json!({ "name": m.name(), "config": m.config_json() }))
            .collect();
        out.push(json!({ "name": "RawConnector", "config": { "name": self.raw.name() } }));
        serde_json::Value::Array(out)
    }

    /// Build the wrapped connector.
    ///
    /// With `layers = [RateLimit, Retry]` the result is
    /// `RateLimit(Retry(Raw))`.
    #[must_use]
    pub fn build(self) -> Arc<dyn GameDataApi> {
        let mut acc: Arc<dyn GameDataApi> = Arc::clone(&self.raw);
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}

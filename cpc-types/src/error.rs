use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the calculator workspace.
///
/// Transport failures are the only retryable class; decode, not-found and
/// cyclic-recipe errors are terminal for the resolution that raised them.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CpcError {
    /// The request never produced a response (connect, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// A response or cached value could not be decoded into the expected shape.
    #[error("decode error for {what}: {msg}")]
    Decode {
        /// What was being decoded, e.g. "recipe 1234".
        what: String,
        /// Decoder message.
        msg: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An item, realm or other named resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "realm Hyjal".
        what: String,
    },

    /// The credential exchange for a region failed.
    #[error("authentication failed for region {region}: {msg}")]
    Auth {
        /// Region whose token could not be obtained.
        region: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Resolution reached a reagent that takes part in a recipe cycle.
    #[error("cycles are not supported: item {item} links back to {partner}")]
    CyclicRecipe {
        /// Reagent whose recursion was refused.
        item: u32,
        /// Item it links back to.
        partner: u32,
    },

    /// The recipe tree was deeper than the configured bound.
    #[error("recursion depth exceeded: {depth}")]
    DepthExceeded {
        /// Configured maximum depth.
        depth: usize,
    },

    /// The cache backend failed.
    #[error("cache error: {0}")]
    Cache(String),

    /// The admission window has been shut down.
    #[error("rate limiter stopped")]
    LimiterStopped,

    /// A caller waited longer than the configured admission timeout.
    #[error("admission timed out after {waited_ms}ms")]
    AdmissionTimeout {
        /// Milliseconds spent waiting for admission.
        waited_ms: u64,
    },

    /// Issues with the returned or expected data (missing fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Several independent lookups failed; contains the individual failures.
    #[error("multiple failures: {0:?}")]
    Multiple(Vec<CpcError>),
}

impl CpcError {
    /// Helper: build a `Transport` error from any displayable cause.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Helper: build a `Decode` error.
    pub fn decode(what: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            what: what.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build an `Auth` error for a region.
    pub fn auth(region: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Auth {
            region: region.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true for errors that describe the request itself rather than
    /// the health of upstream services.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::NotFound { .. }
            | Self::InvalidArg(_)
            | Self::CyclicRecipe { .. }
            | Self::DepthExceeded { .. } => true,
            Self::Multiple(inner) => inner.iter().all(Self::is_terminal),
            _ => false,
        }
    }

    /// Flatten nested `Multiple` structures into a plain vector.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::Multiple(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }

    /// Collapse a list of failures: one error stays as-is, several are wrapped.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn collect(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }
}

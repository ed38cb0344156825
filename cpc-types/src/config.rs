//! Configuration types shared across the calculator and its connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DAY: u64 = 24 * 60 * 60;

/// Admission window settings for calls to the game-data service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum number of requests admitted within a single period.
    pub max_per_period: u32,
    /// Length of the accounting period; the window resets on every boundary.
    pub period: Duration,
    /// Optional upper bound on how long a caller may wait for admission.
    pub admission_timeout: Option<Duration>,
    /// Stop the reset timer when the process receives Ctrl-C.
    ///
    /// Enabling this installs a SIGINT listener through
    /// `tokio::signal::ctrl_c`, which replaces the default handler for the
    /// whole process: Ctrl-C then closes the window instead of terminating
    /// the program. Off by default; [`CpcConfig::from_env`] turns it on for
    /// standalone processes.
    pub stop_on_ctrl_c: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_period: 100,
            period: Duration::from_secs(5),
            admission_timeout: None,
            stop_on_ctrl_c: false,
        }
    }
}

/// Fixed-delay retry policy for transport failures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

/// Expiry class of a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TtlTier {
    /// Reference data that changes with game patches.
    Static,
    /// Live data such as realm lists.
    Dynamic,
    /// Results derived from other cached data.
    Computed,
}

/// Base expiry and the half-width of the uniform jitter applied around it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TtlPolicy {
    /// Centre of the expiry distribution.
    pub base: Duration,
    /// Maximum distance from `base` in either direction.
    pub window: Duration,
}

impl TtlPolicy {
    /// Smallest TTL this policy can produce.
    #[must_use]
    pub fn min(&self) -> Duration {
        self.base.saturating_sub(self.window)
    }

    /// Largest TTL this policy can produce.
    #[must_use]
    pub fn max(&self) -> Duration {
        self.base.saturating_add(self.window)
    }
}

/// TTL policies for the three cache tiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TtlConfig {
    /// Policy for [`TtlTier::Static`].
    pub static_data: TtlPolicy,
    /// Policy for [`TtlTier::Dynamic`].
    pub dynamic_data: TtlPolicy,
    /// Policy for [`TtlTier::Computed`].
    pub computed: TtlPolicy,
}

impl TtlConfig {
    /// Policy for a tier.
    #[must_use]
    pub const fn policy(&self, tier: TtlTier) -> TtlPolicy {
        match tier {
            TtlTier::Static => self.static_data,
            TtlTier::Dynamic => self.dynamic_data,
            TtlTier::Computed => self.computed,
        }
    }
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            static_data: TtlPolicy {
                base: Duration::from_secs(28 * DAY),
                window: Duration::from_secs(8 * DAY),
            },
            dynamic_data: TtlPolicy {
                base: Duration::from_secs(7 * DAY),
                window: Duration::from_secs(3 * DAY),
            },
            computed: TtlPolicy {
                base: Duration::from_secs(3 * DAY),
                window: Duration::from_secs(13 * 60 * 60),
            },
        }
    }
}

/// Knobs for the recipe graph walk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Concurrent sub-tasks allowed at each fan-out point.
    pub fan_out: usize,
    /// Deepest recipe nesting accepted before giving up.
    pub max_depth: usize,
    /// Recipes whose name contains any of these fragments are never
    /// considered as a way to craft an item.
    pub skipped_recipe_fragments: Vec<String>,
    /// When set, only skill tiers whose name contains this text are scanned.
    pub tier_filter: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fan_out: 3,
            max_depth: 16,
            skipped_recipe_fragments: vec!["Prospect".to_string(), "Mill".to_string()],
            tier_filter: None,
        }
    }
}

/// Client credentials for the game-data service.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ApiCredentials {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Top-level configuration assembled by binaries and workers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CpcConfig {
    /// Credentials for the game-data service.
    pub credentials: ApiCredentials,
    /// Admission window settings.
    pub rate_limit: RateLimitConfig,
    /// Transport retry policy.
    pub retry: RetryConfig,
    /// Cache expiry policies.
    pub ttl: TtlConfig,
    /// Resolver settings.
    pub resolver: ResolverConfig,
    /// Redis connection string; `None` selects the in-process cache.
    pub redis_url: Option<String>,
    /// Directory holding the static reference files.
    pub static_dir: Option<String>,
}

impl CpcConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads `CLIENT_ID`, `CLIENT_SECRET`, `USE_REDIS`, `REDIS_URL`,
    /// `STATIC_DIR_ROOT` and `SEARCH_BEFORE_SHADOWLANDS`. The admission window
    /// is set to close on Ctrl-C; everything else keeps its default.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the client credentials are missing, or when
    /// `USE_REDIS` is set without a `REDIS_URL`.
    pub fn from_env() -> Result<Self, crate::CpcError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the client credentials are missing, or when
    /// `USE_REDIS` is set without a `REDIS_URL`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::CpcError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    crate::CpcError::invalid_arg(format!(
                        "must provide a {key} environment variable"
                    ))
                })
        };
        let flag = |key: &str| {
            lookup(key).is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "yes"))
        };

        let mut cfg = Self {
            credentials: ApiCredentials {
                client_id: required("CLIENT_ID")?,
                client_secret: required("CLIENT_SECRET")?,
            },
            ..Self::default()
        };
        cfg.rate_limit.stop_on_ctrl_c = true;
        if flag("USE_REDIS") {
            cfg.redis_url = Some(required("REDIS_URL")?);
        }
        cfg.static_dir = lookup("STATIC_DIR_ROOT").filter(|v| !v.is_empty());
        if flag("SEARCH_BEFORE_SHADOWLANDS") {
            cfg.resolver.tier_filter = Some("Shadowlands".to_string());
        }
        Ok(cfg)
    }
}

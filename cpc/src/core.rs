use std::path::Path;
use std::sync::Arc;

use cpc_core::static_data::STATIC_FILES_DIR;
use cpc_core::{
    CacheStore, Catalog, CpcConfig, CpcError, GameDataApi, ResolverConfig, StaticSources, TtlConfig,
};
use cpc_middleware::{AdmissionWindow, ApiBuilder};

/// Crafting profit calculator over one connector stack and one cache.
///
/// Cheap to share behind an `Arc`; every operation takes `&self`.
pub struct Calculator {
    pub(crate) catalog: Catalog,
    pub(crate) statics: Arc<StaticSources>,
    pub(crate) cfg: ResolverConfig,
    pub(crate) window: Option<Arc<AdmissionWindow>>,
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("catalog", &self.catalog)
            .field("cfg", &self.cfg)
            .field("rate_limited", &self.window.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Calculator`].
pub struct CalculatorBuilder {
    api: Option<Arc<dyn GameDataApi>>,
    cache: Option<CacheStore>,
    ttl: TtlConfig,
    statics: StaticSources,
    cfg: ResolverConfig,
    window: Option<Arc<AdmissionWindow>>,
}

impl Default for CalculatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorBuilder {
    /// Create a new builder with default settings.
    ///
    /// Behavior and trade-offs:
    /// - Starts without a connector; you must provide one via [`with_api`](Self::with_api)
    ///   or [`with_api_builder`](Self::with_api_builder).
    /// - Without an explicit cache an in-process cache with the default TTL tiers is used,
    ///   so computed results live only as long as the process.
    /// - Static tables start empty: no bonus levels, no ranks, no shopping exclusions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api: None,
            cache: None,
            ttl: TtlConfig::default(),
            statics: StaticSources::default(),
            cfg: ResolverConfig::default(),
            window: None,
        }
    }

    /// Use an already composed connector stack.
    ///
    /// Behavior and trade-offs:
    /// - The stack is used as-is; rate limiting and retries are whatever it was built with.
    /// - [`Calculator::shutdown`] can only stop an admission window registered through
    ///   [`admission_window`](Self::admission_window) or
    ///   [`with_api_builder`](Self::with_api_builder).
    #[must_use]
    pub fn with_api(mut self, api: Arc<dyn GameDataApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Build the connector stack from an [`ApiBuilder`] and keep its admission window.
    #[must_use]
    pub fn with_api_builder(mut self, builder: ApiBuilder) -> Self {
        if let Some(window) = builder.admission_window() {
            self.window = Some(window);
        }
        self.api = Some(builder.build());
        self
    }

    /// Share a cache store, e.g. a Redis-backed one.
    ///
    /// Behavior and trade-offs:
    /// - The store's own TTL configuration wins over [`ttl`](Self::ttl).
    /// - Several calculators may share one store; keys carry the region.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = Some(cache);
        self
    }

    /// TTL tiers for the default in-process cache.
    #[must_use]
    pub const fn ttl(mut self, ttl: TtlConfig) -> Self {
        self.ttl = ttl;
        self
    }

    /// Bonus, rank and exclusion tables.
    #[must_use]
    pub fn static_sources(mut self, statics: StaticSources) -> Self {
        self.statics = statics;
        self
    }

    /// Replace every resolver setting at once.
    #[must_use]
    pub fn resolver_config(mut self, cfg: ResolverConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Concurrent sub-resolutions per fan-out point.
    ///
    /// Behavior and trade-offs:
    /// - Applies separately to professions, skill tiers and reagents, so the number of
    ///   requests in flight can exceed this value; the admission window stays the only
    ///   global bound.
    /// - Values below 1 are treated as 1.
    #[must_use]
    pub const fn fan_out(mut self, n: usize) -> Self {
        self.cfg.fan_out = n;
        self
    }

    /// Deepest recipe nesting accepted before failing with `DepthExceeded`.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.cfg.max_depth = depth;
        self
    }

    /// Only scan skill tiers whose name contains `fragment`.
    #[must_use]
    pub fn tier_filter(mut self, fragment: impl Into<String>) -> Self {
        self.cfg.tier_filter = Some(fragment.into());
        self
    }

    /// Register the admission window guarding the connector stack.
    #[must_use]
    pub fn admission_window(mut self, window: Arc<AdmissionWindow>) -> Self {
        self.window = Some(window);
        self
    }

    /// Finish building.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no connector was provided.
    pub fn build(self) -> Result<Calculator, CpcError> {
        let api = self
            .api
            .ok_or_else(|| CpcError::invalid_arg("no game-data connector configured"))?;
        let cache = self.cache.unwrap_or_else(|| CacheStore::in_memory(self.ttl));
        Ok(Calculator {
            catalog: Catalog::new(api, cache),
            statics: Arc::new(self.statics),
            cfg: self.cfg,
            window: self.window,
        })
    }
}

impl Calculator {
    /// Start building a new calculator.
    #[must_use]
    pub fn builder() -> CalculatorBuilder {
        CalculatorBuilder::new()
    }

    /// Assemble a calculator from process configuration.
    ///
    /// `api` is the unwrapped connector builder; the configured rate limit and
    /// retry policy are layered onto it. Static tables are read from
    /// `{static_dir}/static_files` when a directory is configured.
    ///
    /// # Errors
    /// Returns `InvalidArg` when a Redis URL is configured but the `redis`
    /// feature is disabled, and propagates static-file and cache connection
    /// failures.
    pub async fn from_config(config: &CpcConfig, api: ApiBuilder) -> Result<Self, CpcError> {
        let statics = match &config.static_dir {
            Some(root) => StaticSources::load(Path::new(root).join(STATIC_FILES_DIR))?,
            None => StaticSources::default(),
        };
        let cache = match &config.redis_url {
            #[cfg(feature = "redis")]
            Some(url) => CacheStore::redis(url, config.ttl).await?,
            #[cfg(not(feature = "redis"))]
            Some(_) => {
                return Err(CpcError::invalid_arg(
                    "a Redis cache was requested but the redis feature is disabled",
                ));
            }
            None => CacheStore::in_memory(config.ttl),
        };
        let api = api
            .with_rate_limit(config.rate_limit.clone())
            .with_retry(config.retry);

        CalculatorBuilder::new()
            .with_api_builder(api)
            .with_cache(cache)
            .static_sources(statics)
            .resolver_config(config.resolver.clone())
            .build()
    }

    /// Cached lookups used by every operation.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Bonus, rank and exclusion tables.
    #[must_use]
    pub fn static_sources(&self) -> &StaticSources {
        &self.statics
    }

    /// Resolver settings.
    #[must_use]
    pub const fn resolver_config(&self) -> &ResolverConfig {
        &self.cfg
    }

    /// Admission window of the connector stack, when registered.
    #[must_use]
    pub const fn admission_window(&self) -> Option<&Arc<AdmissionWindow>> {
        self.window.as_ref()
    }

    pub(crate) fn fan_out(&self) -> usize {
        self.cfg.fan_out.max(1)
    }

    /// Stop the admission window's reset timer.
    ///
    /// Pending and future requests fail with `LimiterStopped`. A no-op when
    /// no window is registered.
    pub fn shutdown(&self) {
        if let Some(window) = &self.window {
            #[cfg(feature = "tracing")]
            tracing::info!(in_flight = window.in_flight(), "stopping admission window");
            window.stop();
        }
    }
}

//! Namespaced read-through cache with jittered expirations.
//!
//! Values are JSON-encoded and stored under `"{namespace}:->{key}"`. Every
//! namespace belongs to one TTL tier; the TTL of each write is drawn at random
//! from the tier's window (see [`ttl::jittered`]).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cpc_types::{CpcError, TtlConfig, TtlTier};
use serde::Serialize;
use serde::de::DeserializeOwned;

mod memory;
#[cfg(feature = "redis")]
mod redis;
pub mod ttl;

pub use memory::MemoryBackend;
#[cfg(feature = "redis")]
pub use redis::RedisBackend;

/// Raw byte storage with per-entry expiry.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;
    /// Stored bytes, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CpcError>;
    /// Store bytes for `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CpcError>;
    /// True when a live entry exists.
    async fn exists(&self, key: &str) -> Result<bool, CpcError>;
}

/// Key prefixes separating the subsystems that share one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CacheNamespace {
    /// Item name to id.
    ItemSearch,
    /// Realm name to connected-realm id.
    ConnectedRealmData,
    /// Item details.
    ItemData,
    /// Profession skill tier details.
    SkillTierData,
    /// Recipe details.
    RecipeData,
    /// Crafting status for a profession set.
    CraftableByProfessions,
    /// Crafting status for a single profession.
    CraftableByProfession,
    /// Profession details.
    ProfessionDetail,
    /// Regional profession index.
    ProfessionList,
    /// Connected realm details.
    ConnectedRealmDetail,
    /// Cyclic recipe links of a skill tier.
    CyclicLinks,
    /// Every realm name of a region.
    AllRealmNames,
}

impl CacheNamespace {
    /// Prefix used in stored keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ItemSearch => "item_search_cache",
            Self::ConnectedRealmData => "connected_realm_data",
            Self::ItemData => "fetched_item_data",
            Self::SkillTierData => "fetched_profession_skill_tier_detail_data",
            Self::RecipeData => "fetched_profession_recipe_detail_data",
            Self::CraftableByProfessions => "craftable_by_professions_cache",
            Self::CraftableByProfession => "craftable_by_profession",
            Self::ProfessionDetail => "profession_detail_data",
            Self::ProfessionList => "regional_profession_list",
            Self::ConnectedRealmDetail => "connected_realm_detail",
            Self::CyclicLinks => "cyclic_links",
            Self::AllRealmNames => "all_realm_names",
        }
    }

    /// Expiry tier of values in this namespace.
    #[must_use]
    pub const fn tier(self) -> TtlTier {
        match self {
            Self::ItemSearch
            | Self::ItemData
            | Self::SkillTierData
            | Self::RecipeData
            | Self::ProfessionDetail
            | Self::ProfessionList => TtlTier::Static,
            Self::ConnectedRealmData | Self::ConnectedRealmDetail | Self::AllRealmNames => {
                TtlTier::Dynamic
            }
            Self::CraftableByProfessions | Self::CraftableByProfession | Self::CyclicLinks => {
                TtlTier::Computed
            }
        }
    }
}

impl std::fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed, namespaced view over a [`CacheBackend`].
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    ttl: TtlConfig,
}

impl CacheStore {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: TtlConfig) -> Self {
        Self { backend, ttl }
    }

    /// In-process store with default capacity.
    #[must_use]
    pub fn in_memory(ttl: TtlConfig) -> Self {
        Self::new(Arc::new(MemoryBackend::default()), ttl)
    }

    /// Redis-backed store.
    ///
    /// # Errors
    /// Returns `Cache` when the server cannot be reached.
    #[cfg(feature = "redis")]
    pub async fn redis(url: &str, ttl: TtlConfig) -> Result<Self, CpcError> {
        Ok(Self::new(Arc::new(RedisBackend::connect(url).await?), ttl))
    }

    /// Full stored key for `key` in `ns`.
    #[must_use]
    pub fn compose_key(ns: CacheNamespace, key: &str) -> String {
        format!("{}:->{key}", ns.as_str())
    }

    /// Name of the underlying backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// TTL policies in use.
    #[must_use]
    pub const fn ttl_config(&self) -> &TtlConfig {
        &self.ttl
    }

    /// Read a value. A miss is `Ok(None)`.
    ///
    /// A stored value that no longer decodes into `T` is treated as a miss so
    /// the caller recomputes and overwrites it.
    ///
    /// # Errors
    /// Returns `Cache` when the backend fails.
    pub async fn get<T: DeserializeOwned>(
        &self,
        ns: CacheNamespace,
        key: &str,
    ) -> Result<Option<T>, CpcError> {
        let full = Self::compose_key(ns, key);
        let Some(bytes) = self.backend.get(&full).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(v) => Ok(Some(v)),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(key = %full, error = %_e, "discarding undecodable cache entry");
                Ok(None)
            }
        }
    }

    /// Write a value with a TTL drawn from the namespace's tier. Returns the
    /// TTL that was applied.
    ///
    /// # Errors
    /// Returns `Cache` when encoding or the backend fails.
    pub async fn set<T: Serialize + Sync>(
        &self,
        ns: CacheNamespace,
        key: &str,
        value: &T,
    ) -> Result<Duration, CpcError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| CpcError::Cache(format!("encoding {ns} entry failed: {e}")))?;
        let ttl = ttl::jittered(self.ttl.policy(ns.tier()));
        self.backend
            .set(&Self::compose_key(ns, key), bytes, ttl)
            .await?;
        Ok(ttl)
    }

    /// True when a live entry exists.
    ///
    /// # Errors
    /// Returns `Cache` when the backend fails.
    pub async fn exists(&self, ns: CacheNamespace, key: &str) -> Result<bool, CpcError> {
        self.backend.exists(&Self::compose_key(ns, key)).await
    }

    /// Return the cached value, or compute, store and return it.
    ///
    /// Concurrent misses for the same key each compute; the last write wins.
    ///
    /// # Errors
    /// Propagates errors from `compute` and from the backend.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        ns: CacheNamespace,
        key: &str,
        compute: F,
    ) -> Result<T, CpcError>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CpcError>>,
    {
        if let Some(hit) = self.get(ns, key).await? {
            return Ok(hit);
        }
        let value = compute().await?;
        self.set(ns, key, &value).await?;
        Ok(value)
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("backend", &self.backend.name())
            .field("ttl", &self.ttl)
            .finish()
    }
}

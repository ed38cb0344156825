//! Cached, typed lookups against the game-data service.

use std::sync::Arc;

use cpc_types::{ConnectedRealmId, CpcError, ItemId, ItemRef, Namespace, RecipeId, Region};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::{CacheNamespace, CacheStore};
use crate::connector::{ApiRequest, GameDataApi};
use crate::wire::{
    AuctionSnapshot, ConnectedRealm, ConnectedRealmIndex, ItemDetail, ItemSearchPage, Profession,
    ProfessionIndex, RecipeDetail, SkillTier,
};

/// Results requested per item search page.
pub const SEARCH_PAGE_SIZE: u32 = 1000;

const ITEM_SEARCH_PATH: &str = "/data/wow/search/item";
const CONNECTED_REALM_INDEX_PATH: &str = "/data/wow/connected-realm/index";
const PROFESSION_INDEX_PATH: &str = "/data/wow/profession/index";

/// Read-through view of the game-data service.
///
/// Every lookup except the auction snapshot checks the cache first and
/// populates it on a miss.
#[derive(Clone)]
pub struct Catalog {
    api: Arc<dyn GameDataApi>,
    cache: CacheStore,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("api", &self.api.name())
            .field("cache", &self.cache)
            .finish()
    }
}

impl Catalog {
    /// Combine a connector stack with a cache.
    #[must_use]
    pub fn new(api: Arc<dyn GameDataApi>, cache: CacheStore) -> Self {
        Self { api, cache }
    }

    /// Underlying cache, shared with computed results.
    #[must_use]
    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Underlying connector stack.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn GameDataApi> {
        &self.api
    }

    async fn fetch<T: DeserializeOwned>(&self, req: ApiRequest, what: &str) -> Result<T, CpcError> {
        let resp = self.api.fetch(&req).await?;
        #[cfg(feature = "tracing")]
        if resp.wait_cycles > 0 {
            tracing::debug!(
                request = %req.describe(),
                wait_cycles = resp.wait_cycles,
                "request waited for admission"
            );
        }
        resp.decode(what)
    }

    async fn cached<T, F, Fut>(
        &self,
        ns: CacheNamespace,
        key: &str,
        fetch: F,
    ) -> Result<T, CpcError>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CpcError>>,
    {
        self.cache.get_or_compute(ns, key, fetch).await
    }

    /// Resolve an item reference to its id.
    ///
    /// # Errors
    /// Returns `NotFound` when a name matches no item.
    pub async fn resolve_item(&self, region: Region, item: &ItemRef) -> Result<ItemId, CpcError> {
        match item {
            ItemRef::Id(id) => Ok(*id),
            ItemRef::Name(name) => self.item_id(region, name).await,
        }
    }

    /// Find the id of the item whose English name equals `name`, ignoring case.
    ///
    /// The first result page is checked, then the remaining pages in order.
    ///
    /// # Errors
    /// Returns `NotFound` when no page contains a match.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cpc::catalog::item_id", skip(self))
    )]
    pub async fn item_id(&self, region: Region, name: &str) -> Result<ItemId, CpcError> {
        let key = format!("{region}::{name}");
        if let Some(id) = self.cache.get(CacheNamespace::ItemSearch, &key).await? {
            return Ok(id);
        }

        let search = |page: Option<u32>| {
            let mut req = ApiRequest::path(region, ITEM_SEARCH_PATH, Namespace::Static)
                .query("name.en_US", name)
                .query("orderby", "id:desc")
                .query("_pageSize", SEARCH_PAGE_SIZE);
            if let Some(p) = page {
                req = req.query("_page", p);
            }
            req
        };
        let find = |page: &ItemSearchPage| {
            page.results
                .iter()
                .find(|r| r.data.name.en_us.eq_ignore_ascii_case(name))
                .map(|r| r.data.id)
        };

        let what = format!("item search '{name}'");
        let first: ItemSearchPage = self.fetch(search(None), &what).await?;
        if first.page_count == 0 || first.results.is_empty() {
            return Err(CpcError::not_found(format!("item {name}")));
        }

        let mut found = find(&first);
        let mut page = first.page.max(1);
        while found.is_none() && page < first.page_count {
            page += 1;
            let next: ItemSearchPage = self.fetch(search(Some(page)), &what).await?;
            found = find(&next);
        }

        let id = found.ok_or_else(|| CpcError::not_found(format!("item {name}")))?;
        self.cache.set(CacheNamespace::ItemSearch, &key, &id).await?;
        Ok(id)
    }

    async fn connected_realm_links(&self, region: Region) -> Result<ConnectedRealmIndex, CpcError> {
        let req = ApiRequest::path(region, CONNECTED_REALM_INDEX_PATH, Namespace::Dynamic);
        self.fetch(req, "connected realm index").await
    }

    async fn connected_realm_at(
        &self,
        region: Region,
        href: &str,
    ) -> Result<ConnectedRealm, CpcError> {
        let key = format!("{region}::{href}");
        self.cached(CacheNamespace::ConnectedRealmDetail, &key, || async {
            let req = ApiRequest::href(region, href, Namespace::Dynamic);
            self.fetch(req, "connected realm").await
        })
        .await
    }

    /// Connected realm id of the realm named `realm`, ignoring case.
    ///
    /// # Errors
    /// Returns `NotFound` when no connected realm of the region contains it.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cpc::catalog::connected_realm_id", skip(self))
    )]
    pub async fn connected_realm_id(
        &self,
        region: Region,
        realm: &str,
    ) -> Result<ConnectedRealmId, CpcError> {
        let key = format!("{region}::{realm}");
        if let Some(id) = self.cache.get(CacheNamespace::ConnectedRealmData, &key).await? {
            return Ok(id);
        }

        let index = self.connected_realm_links(region).await?;
        for link in &index.connected_realms {
            let detail = self.connected_realm_at(region, &link.href).await?;
            if detail.realms.iter().any(|r| r.name.eq_ignore_ascii_case(realm)) {
                #[cfg(feature = "tracing")]
                tracing::info!(realm, connected_realm = detail.id, "resolved connected realm");
                self.cache
                    .set(CacheNamespace::ConnectedRealmData, &key, &detail.id)
                    .await?;
                return Ok(detail.id);
            }
        }
        Err(CpcError::not_found(format!("realm {realm}")))
    }

    /// Every realm name of a region, in index order.
    ///
    /// # Errors
    /// Propagates fetch and decode failures.
    pub async fn all_realm_names(&self, region: Region) -> Result<Vec<String>, CpcError> {
        self.cached(CacheNamespace::AllRealmNames, region.as_str(), || async {
            let index = self.connected_realm_links(region).await?;
            let mut names = Vec::new();
            for link in &index.connected_realms {
                let detail = self.connected_realm_at(region, &link.href).await?;
                names.extend(detail.realms.into_iter().map(|r| r.name));
            }
            Ok(names)
        })
        .await
    }

    /// Item details.
    ///
    /// # Errors
    /// Propagates fetch and decode failures.
    pub async fn item_details(&self, region: Region, item: ItemId) -> Result<ItemDetail, CpcError> {
        let key = format!("{region}::{item}");
        self.cached(CacheNamespace::ItemData, &key, || async {
            let req = ApiRequest::path(region, format!("/data/wow/item/{item}"), Namespace::Static);
            self.fetch(req, &format!("item {item}")).await
        })
        .await
    }

    /// The region's profession index.
    ///
    /// # Errors
    /// Propagates fetch and decode failures.
    pub async fn profession_index(&self, region: Region) -> Result<ProfessionIndex, CpcError> {
        self.cached(CacheNamespace::ProfessionList, region.as_str(), || async {
            let req = ApiRequest::path(region, PROFESSION_INDEX_PATH, Namespace::Static);
            self.fetch(req, "profession index").await
        })
        .await
    }

    /// Id of the profession named `name`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unknown profession.
    pub async fn profession_id(&self, region: Region, name: &str) -> Result<u32, CpcError> {
        self.profession_index(region)
            .await?
            .professions
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.id)
            .ok_or_else(|| {
                CpcError::invalid_arg(format!("could not find profession id for {name}"))
            })
    }

    /// Profession details with its skill tiers.
    ///
    /// # Errors
    /// Propagates fetch and decode failures.
    pub async fn profession(
        &self,
        region: Region,
        profession: u32,
    ) -> Result<Profession, CpcError> {
        let key = format!("{region}::{profession}");
        self.cached(CacheNamespace::ProfessionDetail, &key, || async {
            let req = ApiRequest::path(
                region,
                format!("/data/wow/profession/{profession}"),
                Namespace::Static,
            );
            self.fetch(req, &format!("profession {profession}")).await
        })
        .await
    }

    /// Skill tier details with its recipe categories.
    ///
    /// # Errors
    /// Propagates fetch and decode failures.
    pub async fn skill_tier(
        &self,
        region: Region,
        profession: u32,
        tier: u32,
    ) -> Result<SkillTier, CpcError> {
        let key = format!("{region}::{profession}::{tier}");
        self.cached(CacheNamespace::SkillTierData, &key, || async {
            let req = ApiRequest::path(
                region,
                format!("/data/wow/profession/{profession}/skill-tier/{tier}"),
                Namespace::Static,
            );
            self.fetch(req, &format!("skill tier {profession}/{tier}")).await
        })
        .await
    }

    /// Recipe details.
    ///
    /// # Errors
    /// Propagates fetch and decode failures.
    pub async fn recipe(&self, region: Region, recipe: RecipeId) -> Result<RecipeDetail, CpcError> {
        let key = format!("{region}::{recipe}");
        self.cached(CacheNamespace::RecipeData, &key, || async {
            let req = ApiRequest::path(
                region,
                format!("/data/wow/recipe/{recipe}"),
                Namespace::Static,
            );
            self.fetch(req, &format!("recipe {recipe}")).await
        })
        .await
    }

    /// Current auction listings of a connected realm. Never cached.
    ///
    /// # Errors
    /// Propagates fetch and decode failures.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cpc::catalog::auctions", skip(self))
    )]
    pub async fn auctions(
        &self,
        region: Region,
        realm: ConnectedRealmId,
    ) -> Result<AuctionSnapshot, CpcError> {
        let req = ApiRequest::path(
            region,
            format!("/data/wow/connected-realm/{realm}/auctions"),
            Namespace::Dynamic,
        );
        let snapshot: AuctionSnapshot = self.fetch(req, &format!("auctions {realm}")).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(listings = snapshot.auctions.len(), "fetched auction snapshot");
        Ok(snapshot)
    }
}

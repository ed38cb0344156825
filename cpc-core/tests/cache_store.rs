use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cpc_core::{CacheBackend, CacheNamespace, CacheStore, MemoryBackend, TtlConfig, TtlPolicy};

fn fixed_ttl(secs: u64) -> TtlConfig {
    let p = TtlPolicy {
        base: Duration::from_secs(secs),
        window: Duration::ZERO,
    };
    TtlConfig {
        static_data: p,
        dynamic_data: p,
        computed: p,
    }
}

#[tokio::test]
async fn miss_is_none_not_error() {
    let store = CacheStore::in_memory(TtlConfig::default());
    let v: Option<u32> = store.get(CacheNamespace::ItemData, "1").await.unwrap();
    assert!(v.is_none());
    assert!(!store.exists(CacheNamespace::ItemData, "1").await.unwrap());
}

#[tokio::test]
async fn namespaces_do_not_collide() {
    let store = CacheStore::in_memory(TtlConfig::default());
    store.set(CacheNamespace::ItemData, "us::1", &"item").await.unwrap();
    store.set(CacheNamespace::RecipeData, "us::1", &"recipe").await.unwrap();

    let a: Option<String> = store.get(CacheNamespace::ItemData, "us::1").await.unwrap();
    let b: Option<String> = store.get(CacheNamespace::RecipeData, "us::1").await.unwrap();
    assert_eq!(a.as_deref(), Some("item"));
    assert_eq!(b.as_deref(), Some("recipe"));
    assert_eq!(
        CacheStore::compose_key(CacheNamespace::CyclicLinks, "us::Tier::164"),
        "cyclic_links:->us::Tier::164"
    );
}

#[tokio::test(start_paused = true)]
async fn entries_expire_at_their_ttl() {
    let store = CacheStore::in_memory(fixed_ttl(60));
    let ttl = store
        .set(CacheNamespace::AllRealmNames, "us", &vec!["Hyjal"])
        .await
        .unwrap();
    assert_eq!(ttl, Duration::from_secs(60));

    tokio::time::advance(Duration::from_secs(59)).await;
    assert!(store.exists(CacheNamespace::AllRealmNames, "us").await.unwrap());

    tokio::time::advance(Duration::from_secs(2)).await;
    let gone: Option<Vec<String>> = store.get(CacheNamespace::AllRealmNames, "us").await.unwrap();
    assert!(gone.is_none());
    assert!(!store.exists(CacheNamespace::AllRealmNames, "us").await.unwrap());
}

#[tokio::test]
async fn get_or_compute_populates_once() {
    let store = CacheStore::in_memory(TtlConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let calls = Arc::clone(&calls);
        let v: u32 = store
            .get_or_compute(CacheNamespace::ConnectedRealmData, "us::Hyjal", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(77)
            })
            .await
            .unwrap();
        assert_eq!(v, 77);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn compute_errors_are_not_cached() {
    let store = CacheStore::in_memory(TtlConfig::default());
    let err = store
        .get_or_compute::<u32, _, _>(CacheNamespace::ItemSearch, "us::Nope", || async {
            Err(cpc_core::CpcError::not_found("item Nope"))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, cpc_core::CpcError::NotFound { .. }));
    assert!(!store.exists(CacheNamespace::ItemSearch, "us::Nope").await.unwrap());
}

#[tokio::test]
async fn undecodable_entry_reads_as_miss() {
    let backend = Arc::new(MemoryBackend::default());
    backend
        .set("fetched_item_data:->us::5", b"not json".to_vec(), Duration::from_secs(60))
        .await
        .unwrap();
    let store = CacheStore::new(backend, TtlConfig::default());
    let v: Option<u32> = store.get(CacheNamespace::ItemData, "us::5").await.unwrap();
    assert!(v.is_none());
}

#[tokio::test]
async fn lru_capacity_evicts_oldest() {
    let backend = MemoryBackend::new(1);
    backend.set("a", vec![1], Duration::from_secs(60)).await.unwrap();
    backend.set("b", vec![2], Duration::from_secs(60)).await.unwrap();
    assert_eq!(backend.len().await, 1);
    assert!(backend.get("a").await.unwrap().is_none());
    assert_eq!(backend.get("b").await.unwrap(), Some(vec![2]));
}

#[test]
fn namespaces_map_to_tiers() {
    use cpc_core::TtlTier;
    assert_eq!(CacheNamespace::RecipeData.tier(), TtlTier::Static);
    assert_eq!(CacheNamespace::ConnectedRealmDetail.tier(), TtlTier::Dynamic);
    assert_eq!(CacheNamespace::CraftableByProfessions.tier(), TtlTier::Computed);
    assert_eq!(CacheNamespace::CyclicLinks.to_string(), "cyclic_links");
}

//! TTL expiry and capacity bounds of the backing store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use federation_cache::{
    ApplicationId, CacheConfig, FederationCache, FederationStateStore, Result, SubClusterId,
    SubClusterInfo, SubClusterPolicyConfiguration, SubClusterState,
};

/// Every application lives on "SC-<id>"; counts lookups.
#[derive(Default)]
struct EchoStore {
    sub_cluster_calls: AtomicU32,
    app_home_calls: AtomicU32,
}

#[async_trait]
impl FederationStateStore for EchoStore {
    fn name(&self) -> &str {
        "echo"
    }

    async fn sub_clusters(&self) -> Result<Vec<SubClusterInfo>> {
        self.sub_cluster_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![SubClusterInfo::new("SC-1", SubClusterState::Running)])
    }

    async fn policy_configurations(&self) -> Result<HashMap<String, SubClusterPolicyConfiguration>> {
        Ok(HashMap::new())
    }

    async fn application_home_sub_cluster(&self, app: &ApplicationId) -> Result<SubClusterId> {
        self.app_home_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SubClusterId::new(format!("SC-{}", app.id)))
    }
}

fn app(id: u32) -> ApplicationId {
    ApplicationId::new(1_700_000_000_000, id)
}

// =========================================================================
// TTL
// =========================================================================

#[tokio::test]
async fn entry_expires_after_ttl() {
    let store = Arc::new(EchoStore::default());
    let cache = FederationCache::new(
        CacheConfig::new().ttl(Duration::from_millis(100)),
        store.clone(),
    );

    cache.get_sub_clusters(true).await.unwrap();
    cache.get_sub_clusters(true).await.unwrap();
    assert_eq!(store.sub_cluster_calls.load(Ordering::SeqCst), 1);

    // Wait for TTL + some margin
    tokio::time::sleep(Duration::from_millis(250)).await;

    let key = cache.sub_cluster_cache_key(true);
    assert!(
        cache.store().unwrap().unwrap().get(&key).await.is_none(),
        "expired entry must not be observed"
    );

    cache.get_sub_clusters(true).await.unwrap();
    assert_eq!(store.sub_cluster_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn repopulated_entry_gets_fresh_ttl() {
    let store = Arc::new(EchoStore::default());
    let cache = FederationCache::new(
        CacheConfig::new().ttl(Duration::from_millis(300)),
        store.clone(),
    );

    cache.get_application_home_sub_cluster(&app(1)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    // Expired: repopulates at t≈400ms
    cache.get_application_home_sub_cluster(&app(1)).await.unwrap();
    assert_eq!(store.app_home_calls.load(Ordering::SeqCst), 2);

    // Still within the new entry's lifetime
    tokio::time::sleep(Duration::from_millis(100)).await;
    cache.get_application_home_sub_cluster(&app(1)).await.unwrap();
    assert_eq!(store.app_home_calls.load(Ordering::SeqCst), 2);
}

// =========================================================================
// Capacity
// =========================================================================

#[tokio::test]
async fn store_never_exceeds_capacity() {
    let store = Arc::new(EchoStore::default());
    let cache = FederationCache::new(CacheConfig::new().max_entries(10), store);

    for id in 0..50 {
        let home = cache.get_application_home_sub_cluster(&app(id)).await.unwrap();
        assert_eq!(home, SubClusterId::new(format!("SC-{id}")));
    }

    let entries = cache.store().unwrap().unwrap();
    entries.run_pending_tasks().await;
    assert!(
        entries.entry_count() <= 10,
        "entry count {} exceeds capacity",
        entries.entry_count()
    );
}

#[tokio::test]
async fn least_recently_used_entry_is_evicted() {
    let store = Arc::new(EchoStore::default());
    let cache = FederationCache::new(CacheConfig::new().max_entries(2), store.clone());
    let entries = cache.store().unwrap().unwrap();

    cache.get_application_home_sub_cluster(&app(1)).await.unwrap();
    entries.run_pending_tasks().await;
    cache.get_application_home_sub_cluster(&app(2)).await.unwrap();
    entries.run_pending_tasks().await;
    cache.get_application_home_sub_cluster(&app(3)).await.unwrap();
    entries.run_pending_tasks().await;

    assert_eq!(entries.entry_count(), 2);
    assert!(!entries.contains_key(&cache.app_home_sub_cluster_cache_key(&app(1))));
    assert!(entries.contains_key(&cache.app_home_sub_cluster_cache_key(&app(2))));
    assert!(entries.contains_key(&cache.app_home_sub_cluster_cache_key(&app(3))));

    // The evicted application goes back to the state store
    cache.get_application_home_sub_cluster(&app(1)).await.unwrap();
    assert_eq!(store.app_home_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn recent_read_protects_entry_from_eviction() {
    let store = Arc::new(EchoStore::default());
    let cache = FederationCache::new(CacheConfig::new().max_entries(2), store.clone());
    let entries = cache.store().unwrap().unwrap();

    cache.get_application_home_sub_cluster(&app(1)).await.unwrap();
    entries.run_pending_tasks().await;
    cache.get_application_home_sub_cluster(&app(2)).await.unwrap();
    entries.run_pending_tasks().await;

    // Touch app 1 so app 2 becomes least recently used
    cache.get_application_home_sub_cluster(&app(1)).await.unwrap();
    entries.run_pending_tasks().await;

    cache.get_application_home_sub_cluster(&app(3)).await.unwrap();
    entries.run_pending_tasks().await;

    assert!(entries.contains_key(&cache.app_home_sub_cluster_cache_key(&app(1))));
    assert!(!entries.contains_key(&cache.app_home_sub_cluster_cache_key(&app(2))));
    assert_eq!(store.app_home_calls.load(Ordering::SeqCst), 3);
}

//! Read-through cache in front of a [`FederationStateStore`].
//!
//! Every query follows the same template: build a key, look it up, and on a
//! miss ask the state store, wrap the answer in a [`CacheRequest`], store it
//! and return a projection of it.
//!
//! # Lifecycle
//!
//! ```text
//!            new(enabled)            query
//!   ┌──────────────────┐  clear()  ┌───────────────┐
//!   │      Active      │ ────────► │ Uninitialized │
//!   │  (moka store)    │ ◄──────── │               │
//!   └──────────────────┘  query    └───────────────┘
//! ```
//!
//! Whether caching is enabled is decided once, in [`FederationCache::new`].
//! A disabled cache never builds a store and sends every call straight to
//! the state store.
//!
//! # Concurrency
//!
//! The store is moka's concurrent LRU + TTL cache and needs no external
//! locking. Two concurrent misses on the same key both query the state
//! store and both insert; the last insert wins. Failures are never cached.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use tracing::{debug, info, instrument, warn};

use super::config::CacheConfig;
use super::key::{CacheKey, QueryKind, build_cache_key};
use super::request::{CacheRequest, CacheResponse, CollectionResponse, ScalarResponse};
use crate::store::FederationStateStore;
use crate::telemetry;
use crate::types::{ApplicationId, SubClusterId, SubClusterInfo, SubClusterPolicyConfiguration};
use crate::{FederationError, Result};

/// Backing store: cache key → shared cached request.
pub type EntryStore = Cache<CacheKey, Arc<CacheRequest>>;

enum Lifecycle {
    Uninitialized,
    Active(EntryStore),
}

/// Caching facade over a federation state store.
pub struct FederationCache {
    config: CacheConfig,
    state_store: Arc<dyn FederationStateStore>,
    enabled: bool,
    lifecycle: RwLock<Lifecycle>,
}

impl FederationCache {
    /// Create a cache over `state_store`.
    ///
    /// Caching is enabled when the config has a non-zero TTL and capacity;
    /// otherwise the cache is a passthrough for its whole lifetime.
    pub fn new(config: CacheConfig, state_store: Arc<dyn FederationStateStore>) -> Self {
        let enabled = config.is_enabled();
        let lifecycle = if enabled {
            Lifecycle::Active(build_store(&config))
        } else {
            warn!(
                scope = %config.scope,
                ttl_secs = config.ttl.as_secs_f64(),
                max_entries = config.max_entries,
                "federation cache disabled, queries go straight to the state store"
            );
            Lifecycle::Uninitialized
        };
        Self {
            config,
            state_store,
            enabled,
            lifecycle: RwLock::new(lifecycle),
        }
    }

    /// Whether results are being cached.
    pub fn is_caching_enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// All sub-clusters, keyed by id. With `filter_inactive`, only running
    /// sub-clusters are returned.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_sub_clusters(
        &self,
        filter_inactive: bool,
    ) -> Result<HashMap<SubClusterId, SubClusterInfo>> {
        let flag = filter_inactive.to_string();
        let request = self
            .read_through(QueryKind::SubClusters, &[flag.as_str()], move || async move {
                let sub_clusters = self.state_store.sub_clusters().await?;
                let map = sub_clusters
                    .into_iter()
                    .filter(|sc| !filter_inactive || sc.is_active())
                    .map(|sc| (sc.sub_cluster_id.clone(), sc))
                    .collect();
                Ok(CacheResponse::Collection(CollectionResponse::SubClusters(
                    map,
                )))
            })
            .await?;
        request
            .response()
            .sub_clusters()
            .cloned()
            .ok_or_else(|| shape_mismatch(&request))
    }

    /// A single sub-cluster from the (cached) listing.
    pub async fn get_sub_cluster(
        &self,
        id: &SubClusterId,
        filter_inactive: bool,
    ) -> Result<SubClusterInfo> {
        let mut sub_clusters = self.get_sub_clusters(filter_inactive).await?;
        sub_clusters
            .remove(id)
            .ok_or_else(|| FederationError::SubClusterNotFound(id.clone()))
    }

    /// All policy configurations, keyed by queue.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_policies_configurations(
        &self,
    ) -> Result<HashMap<String, SubClusterPolicyConfiguration>> {
        let request = self
            .read_through(QueryKind::PoliciesConfigurations, &[], move || async move {
                let policies = self.state_store.policy_configurations().await?;
                Ok(CacheResponse::Collection(
                    CollectionResponse::PolicyConfigurations(policies),
                ))
            })
            .await?;
        request
            .response()
            .policy_configurations()
            .cloned()
            .ok_or_else(|| shape_mismatch(&request))
    }

    /// The policy for one queue from the (cached) policy map.
    pub async fn get_policy_configuration(
        &self,
        queue: &str,
    ) -> Result<SubClusterPolicyConfiguration> {
        let mut policies = self.get_policies_configurations().await?;
        policies
            .remove(queue)
            .ok_or_else(|| FederationError::PolicyNotFound(queue.to_string()))
    }

    /// The sub-cluster that owns `app`.
    #[instrument(skip(self, app), level = "debug", fields(app = %app))]
    pub async fn get_application_home_sub_cluster(
        &self,
        app: &ApplicationId,
    ) -> Result<SubClusterId> {
        let app_param = app.to_string();
        let request = self
            .read_through(
                QueryKind::AppHomeSubCluster,
                &[app_param.as_str()],
                move || async move {
                    let home = self.state_store.application_home_sub_cluster(app).await?;
                    Ok(CacheResponse::Scalar(ScalarResponse::HomeSubCluster(home)))
                },
            )
            .await?;
        request
            .response()
            .home_sub_cluster()
            .cloned()
            .ok_or_else(|| shape_mismatch(&request))
    }

    /// Drop the cached sub-cluster listing for `filter_inactive` so the next
    /// [`get_sub_clusters`](Self::get_sub_clusters) with the same flag goes
    /// back to the state store. Other entries are untouched.
    pub async fn invalidate_sub_cluster_listing(&self, filter_inactive: bool) -> Result<()> {
        let Some(store) = self.current_store()? else {
            return Ok(());
        };
        let key = self.sub_cluster_cache_key(filter_inactive);
        store.invalidate(&key).await;
        metrics::counter!(
            telemetry::CACHE_INVALIDATIONS_TOTAL,
            "query" => QueryKind::SubClusters.as_str()
        )
        .increment(1);
        debug!(key = %key, "invalidated sub-cluster listing");
        Ok(())
    }

    /// Drop every entry and release the store. The next query on an
    /// enabled cache builds a fresh one.
    pub fn clear(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.write().map_err(|e| {
            FederationError::Configuration(format!("Failed to acquire write lock: {e}"))
        })?;
        if let Lifecycle::Active(store) = &*lifecycle {
            store.invalidate_all();
            info!(scope = %self.config.scope, "federation cache cleared");
        }
        *lifecycle = Lifecycle::Uninitialized;
        Ok(())
    }

    /// Handle to the backing store, if one currently exists.
    ///
    /// Intended for white-box verification; callers should go through the
    /// query methods. `Ok(None)` means disabled or cleared.
    pub fn store(&self) -> Result<Option<EntryStore>> {
        self.current_store()
    }

    /// Key used by [`get_sub_clusters`](Self::get_sub_clusters).
    pub fn sub_cluster_cache_key(&self, filter_inactive: bool) -> CacheKey {
        build_cache_key(
            &self.config.scope,
            QueryKind::SubClusters,
            &[filter_inactive.to_string().as_str()],
        )
    }

    /// Key used by [`get_policies_configurations`](Self::get_policies_configurations).
    pub fn policies_cache_key(&self) -> CacheKey {
        build_cache_key(&self.config.scope, QueryKind::PoliciesConfigurations, &[])
    }

    /// Key used by
    /// [`get_application_home_sub_cluster`](Self::get_application_home_sub_cluster).
    pub fn app_home_sub_cluster_cache_key(&self, app: &ApplicationId) -> CacheKey {
        build_cache_key(
            &self.config.scope,
            QueryKind::AppHomeSubCluster,
            &[app.to_string().as_str()],
        )
    }

    /// Shared read-through path.
    ///
    /// `load` runs on a miss (or always, when disabled). Its error is
    /// returned as-is and nothing is stored.
    async fn read_through<F, Fut>(
        &self,
        kind: QueryKind,
        params: &[&str],
        load: F,
    ) -> Result<Arc<CacheRequest>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CacheResponse>>,
    {
        let scope = self.config.scope.as_str();

        if !self.enabled {
            metrics::counter!(telemetry::CACHE_PASSTHROUGH_TOTAL, "query" => kind.as_str())
                .increment(1);
            let response = load().await?;
            return Ok(Arc::new(CacheRequest::new(scope, kind, params, response)));
        }

        let store = self.active_store()?;
        let key = build_cache_key(scope, kind, params);

        if let Some(request) = store.get(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "query" => kind.as_str()).increment(1);
            debug!(key = %key, "cache hit");
            return Ok(request);
        }

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "query" => kind.as_str()).increment(1);
        debug!(key = %key, "cache miss");

        let response = load().await?;
        let request = Arc::new(CacheRequest::new(scope, kind, params, response));
        store.insert(key, Arc::clone(&request)).await;
        Ok(request)
    }

    /// The active store, building one if the cache was cleared.
    ///
    /// Uses double-checked locking so concurrent callers after a `clear()`
    /// agree on a single new store.
    fn active_store(&self) -> Result<EntryStore> {
        if let Some(store) = self.current_store()? {
            return Ok(store);
        }

        let mut lifecycle = self.lifecycle.write().map_err(|e| {
            FederationError::Configuration(format!("Failed to acquire write lock: {e}"))
        })?;

        if let Lifecycle::Active(store) = &*lifecycle {
            return Ok(store.clone());
        }

        let store = build_store(&self.config);
        *lifecycle = Lifecycle::Active(store.clone());
        Ok(store)
    }

    fn current_store(&self) -> Result<Option<EntryStore>> {
        let lifecycle = self.lifecycle.read().map_err(|e| {
            FederationError::Configuration(format!("Failed to acquire read lock: {e}"))
        })?;
        Ok(match &*lifecycle {
            Lifecycle::Active(store) => Some(store.clone()),
            Lifecycle::Uninitialized => None,
        })
    }
}

fn build_store(config: &CacheConfig) -> EntryStore {
    info!(
        scope = %config.scope,
        ttl_secs = config.ttl.as_secs_f64(),
        max_entries = config.max_entries,
        "creating federation cache store"
    );
    Cache::builder()
        .name(&config.scope)
        .max_capacity(config.max_entries)
        .time_to_live(config.ttl)
        .eviction_policy(EvictionPolicy::lru())
        .build()
}

fn shape_mismatch(request: &CacheRequest) -> FederationError {
    FederationError::ResponseShape {
        key: request.key().to_string(),
        expected: request.kind(),
    }
}

//! The federation state store, as seen from the cache.
//!
//! The cache never implements storage itself; it consumes a
//! [`FederationStateStore`] and calls it on every miss (or on every call,
//! when caching is disabled). Implementations are expected to be the
//! expensive, authoritative source shared by many routers.
//!
//! [`MemoryStateStore`] is an in-process implementation for tests, local
//! tooling, and snapshot replay.

mod memory;

pub use memory::{ApplicationHome, MemoryStateStore, Snapshot};

use std::collections::HashMap;

use async_trait::async_trait;

use crate::Result;
use crate::types::{ApplicationId, SubClusterId, SubClusterInfo, SubClusterPolicyConfiguration};

/// Queries the cache issues against the authoritative registry.
///
/// Errors are returned to the cache caller verbatim. Timeouts, retries and
/// connection handling are the implementation's concern.
#[async_trait]
pub trait FederationStateStore: Send + Sync {
    /// Store name for logging/debugging.
    fn name(&self) -> &str;

    /// All registered sub-clusters, regardless of state.
    ///
    /// Active-only filtering is applied by the cache, not the store.
    async fn sub_clusters(&self) -> Result<Vec<SubClusterInfo>>;

    /// All policy configurations, keyed by queue.
    async fn policy_configurations(&self) -> Result<HashMap<String, SubClusterPolicyConfiguration>>;

    /// The sub-cluster that owns `app`.
    ///
    /// Fails with [`ApplicationNotFound`](crate::FederationError::ApplicationNotFound)
    /// when the application is unknown.
    async fn application_home_sub_cluster(&self, app: &ApplicationId) -> Result<SubClusterId>;
}

//! In-memory state store.
//!
//! Holds sub-clusters, policies and application homes in process memory.
//! Can be seeded from a TOML snapshot:
//!
//! ```toml
//! [[sub_clusters]]
//! sub_cluster_id = "SC-1"
//! state = "running"
//! rm_web_service_address = "rm1.example.com:8088"
//!
//! [[policies]]
//! queue = "root.default"
//! policy_type = "UniformBroadcastPolicyManager"
//!
//! [[applications]]
//! application_id = "application_1700000000000_0001"
//! home_sub_cluster = "SC-1"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::FederationStateStore;
use crate::types::{ApplicationId, SubClusterId, SubClusterInfo, SubClusterPolicyConfiguration};
use crate::{FederationError, Result};

/// Serialized contents of a [`MemoryStateStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub sub_clusters: Vec<SubClusterInfo>,
    #[serde(default)]
    pub policies: Vec<SubClusterPolicyConfiguration>,
    #[serde(default)]
    pub applications: Vec<ApplicationHome>,
}

/// One application → home sub-cluster record in a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationHome {
    pub application_id: ApplicationId,
    pub home_sub_cluster: SubClusterId,
}

#[derive(Default)]
struct Tables {
    sub_clusters: HashMap<SubClusterId, SubClusterInfo>,
    policies: HashMap<String, SubClusterPolicyConfiguration>,
    applications: HashMap<ApplicationId, SubClusterId>,
}

/// Thread-safe in-memory [`FederationStateStore`].
#[derive(Default)]
pub struct MemoryStateStore {
    tables: RwLock<Tables>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the contents of `snapshot`.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let tables = Tables {
            sub_clusters: snapshot
                .sub_clusters
                .into_iter()
                .map(|sc| (sc.sub_cluster_id.clone(), sc))
                .collect(),
            policies: snapshot
                .policies
                .into_iter()
                .map(|p| (p.queue.clone(), p))
                .collect(),
            applications: snapshot
                .applications
                .into_iter()
                .map(|a| (a.application_id, a.home_sub_cluster))
                .collect(),
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Parse a TOML snapshot.
    pub fn from_toml(content: &str) -> Result<Self> {
        let snapshot: Snapshot = toml::from_str(content).map_err(|e| {
            FederationError::Configuration(format!("Failed to parse snapshot: {e}"))
        })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a TOML snapshot from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FederationError::Configuration(format!("Failed to read snapshot {path:?}: {e}"))
        })?;
        let store = Self::from_toml(&content)?;
        info!(path = %path.display(), "loaded state store snapshot");
        Ok(store)
    }

    /// Register (or replace) a sub-cluster.
    pub fn register_sub_cluster(&self, info: SubClusterInfo) -> Result<()> {
        let mut tables = self.write()?;
        tables.sub_clusters.insert(info.sub_cluster_id.clone(), info);
        Ok(())
    }

    /// Remove a sub-cluster. Returns true if it was registered.
    pub fn deregister_sub_cluster(&self, id: &SubClusterId) -> Result<bool> {
        let mut tables = self.write()?;
        Ok(tables.sub_clusters.remove(id).is_some())
    }

    /// Set (or replace) the policy for `config.queue`.
    pub fn set_policy_configuration(&self, config: SubClusterPolicyConfiguration) -> Result<()> {
        let mut tables = self.write()?;
        tables.policies.insert(config.queue.clone(), config);
        Ok(())
    }

    /// Record the home sub-cluster of an application.
    pub fn add_application_home(&self, app: ApplicationId, home: SubClusterId) -> Result<()> {
        let mut tables = self.write()?;
        tables.applications.insert(app, home);
        Ok(())
    }

    /// Forget an application. Returns true if it was known.
    pub fn delete_application_home(&self, app: &ApplicationId) -> Result<bool> {
        let mut tables = self.write()?;
        Ok(tables.applications.remove(app).is_some())
    }

    /// Current contents as a [`Snapshot`], sorted for stable output.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let tables = self.read()?;
        let mut sub_clusters: Vec<_> = tables.sub_clusters.values().cloned().collect();
        sub_clusters.sort_by(|a, b| a.sub_cluster_id.cmp(&b.sub_cluster_id));
        let mut policies: Vec<_> = tables.policies.values().cloned().collect();
        policies.sort_by(|a, b| a.queue.cmp(&b.queue));
        let mut applications: Vec<_> = tables
            .applications
            .iter()
            .map(|(app, home)| ApplicationHome {
                application_id: *app,
                home_sub_cluster: home.clone(),
            })
            .collect();
        applications.sort_by_key(|a| a.application_id);
        Ok(Snapshot {
            sub_clusters,
            policies,
            applications,
        })
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| FederationError::StateStore(format!("Failed to acquire read lock: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| FederationError::StateStore(format!("Failed to acquire write lock: {e}")))
    }
}

#[async_trait]
impl FederationStateStore for MemoryStateStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn sub_clusters(&self) -> Result<Vec<SubClusterInfo>> {
        Ok(self.read()?.sub_clusters.values().cloned().collect())
    }

    async fn policy_configurations(&self) -> Result<HashMap<String, SubClusterPolicyConfiguration>> {
        Ok(self.read()?.policies.clone())
    }

    async fn application_home_sub_cluster(&self, app: &ApplicationId) -> Result<SubClusterId> {
        self.read()?
            .applications
            .get(app)
            .cloned()
            .ok_or(FederationError::ApplicationNotFound(*app))
    }
}

//! Sub-cluster identity and membership records.
//!
//! A sub-cluster is one member cluster of a federated deployment. The state
//! store keeps one [`SubClusterInfo`] per member, refreshed by heartbeats.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a sub-cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubClusterId(String);

impl SubClusterId {
    /// Create an identifier from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubClusterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SubClusterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle state of a sub-cluster as reported to the state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubClusterState {
    /// Registered but not yet heartbeating.
    #[default]
    New,
    /// Heartbeating and accepting work.
    Running,
    /// Heartbeating but reporting problems.
    Unhealthy,
    /// Draining before removal.
    Decommissioning,
    /// Stopped heartbeating.
    Lost,
    /// Deregistered by an operator.
    Unregistered,
    /// Fully drained and removed.
    Decommissioned,
}

impl SubClusterState {
    /// Only running sub-clusters take new work.
    pub fn is_active(self) -> bool {
        self == SubClusterState::Running
    }

    /// Terminal states; the sub-cluster will not come back without
    /// re-registering.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            SubClusterState::Unregistered | SubClusterState::Decommissioned | SubClusterState::Lost
        )
    }
}

/// Descriptor of one sub-cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubClusterInfo {
    pub sub_cluster_id: SubClusterId,
    /// Address of the AM-RM proxy endpoint.
    #[serde(default)]
    pub amrm_service_address: String,
    /// Address of the client RM endpoint.
    #[serde(default)]
    pub client_rm_service_address: String,
    /// Address of the RM admin endpoint.
    #[serde(default)]
    pub rm_admin_service_address: String,
    /// Address of the RM web endpoint.
    #[serde(default)]
    pub rm_web_service_address: String,
    /// Last heartbeat, epoch millis.
    #[serde(default)]
    pub last_heartbeat: u64,
    #[serde(default)]
    pub state: SubClusterState,
    /// Last start time, epoch millis.
    #[serde(default)]
    pub last_start_time: u64,
    /// Opaque capability report (serialized cluster metrics).
    #[serde(default)]
    pub capability: String,
}

impl SubClusterInfo {
    /// Create a descriptor with the given id and state; addresses and
    /// timestamps start empty.
    pub fn new(id: impl Into<SubClusterId>, state: SubClusterState) -> Self {
        Self {
            sub_cluster_id: id.into(),
            amrm_service_address: String::new(),
            client_rm_service_address: String::new(),
            rm_admin_service_address: String::new(),
            rm_web_service_address: String::new(),
            last_heartbeat: 0,
            state,
            last_start_time: 0,
            capability: String::new(),
        }
    }

    /// Set the RM web address.
    pub fn with_rm_web_address(mut self, addr: impl Into<String>) -> Self {
        self.rm_web_service_address = addr.into();
        self
    }

    /// Set the AM-RM proxy address.
    pub fn with_amrm_address(mut self, addr: impl Into<String>) -> Self {
        self.amrm_service_address = addr.into();
        self
    }

    /// Set the last heartbeat timestamp.
    pub fn with_last_heartbeat(mut self, millis: u64) -> Self {
        self.last_heartbeat = millis;
        self
    }

    /// Whether this sub-cluster currently accepts work.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

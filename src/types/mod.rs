//! Domain records served by the federation state store.

mod application;
mod policy;
mod sub_cluster;

pub use application::ApplicationId;
pub use policy::SubClusterPolicyConfiguration;
pub use sub_cluster::{SubClusterId, SubClusterInfo, SubClusterState};

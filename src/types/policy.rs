//! Federation policy configuration records.

use serde::{Deserialize, Serialize};

/// Policy configuration for one queue.
///
/// `params` is the serialized policy body; its format belongs to the policy
/// implementation named by `policy_type` and is never inspected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubClusterPolicyConfiguration {
    /// Queue (or reservation scope) this policy governs.
    pub queue: String,
    /// Fully-qualified policy manager type.
    pub policy_type: String,
    /// Opaque serialized policy parameters.
    #[serde(default)]
    pub params: Vec<u8>,
}

impl SubClusterPolicyConfiguration {
    pub fn new(queue: impl Into<String>, policy_type: impl Into<String>, params: Vec<u8>) -> Self {
        Self {
            queue: queue.into(),
            policy_type: policy_type.into(),
            params,
        }
    }
}

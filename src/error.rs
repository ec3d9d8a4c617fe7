//! Federation cache error types

use crate::cache::QueryKind;
use crate::types::{ApplicationId, SubClusterId};

/// Federation cache error types.
///
/// State-store failures travel through the cache unchanged: whatever the
/// [`FederationStateStore`](crate::store::FederationStateStore) returns on a
/// miss is what the caller sees, and nothing is cached for that key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FederationError {
    // Lookup errors
    #[error("application {0} does not exist in the state store")]
    ApplicationNotFound(ApplicationId),

    #[error("sub-cluster not found: {0}")]
    SubClusterNotFound(SubClusterId),

    #[error("no policy configuration for queue '{0}'")]
    PolicyNotFound(String),

    // Upstream errors
    #[error("state store error: {0}")]
    StateStore(String),

    // Data errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A cached entry did not hold the shape its query kind implies.
    #[error("cached entry {key} does not hold a {expected} response")]
    ResponseShape { key: String, expected: QueryKind },
}

impl FederationError {
    /// Whether this error originated from the state store rather than the
    /// cache layer itself.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            FederationError::ApplicationNotFound(_) | FederationError::StateStore(_)
        )
    }
}

/// Result type alias for federation cache operations
pub type Result<T> = std::result::Result<T, FederationError>;

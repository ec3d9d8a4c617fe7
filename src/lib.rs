//! federation-cache - read-through cache for a federation state store
//!
//! Federation routers repeatedly ask a shared state store the same
//! questions: which sub-clusters exist, which policy governs a queue, and
//! which sub-cluster owns an application. [`FederationCache`] answers repeats
//! from memory for a bounded time (TTL) and a bounded number of entries,
//! and falls back to the state store on every miss.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use federation_cache::{
//!     CacheConfig, FederationCache, MemoryStateStore, SubClusterInfo, SubClusterState,
//! };
//!
//! #[tokio::main]
//! async fn main() -> federation_cache::Result<()> {
//!     let store = MemoryStateStore::new();
//!     store.register_sub_cluster(SubClusterInfo::new("SC-1", SubClusterState::Running))?;
//!     store.register_sub_cluster(SubClusterInfo::new("SC-2", SubClusterState::Lost))?;
//!
//!     let cache = FederationCache::new(
//!         CacheConfig::new().scope("router-1").ttl(Duration::from_secs(60)),
//!         Arc::new(store),
//!     );
//!
//!     // First call goes to the state store, the second is served from memory.
//!     let active = cache.get_sub_clusters(true).await?;
//!     assert_eq!(active.len(), 1);
//!     let again = cache.get_sub_clusters(true).await?;
//!     assert_eq!(active, again);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheKey, FederationCache, QueryKind};
pub use config::Config;
pub use error::{FederationError, Result};
pub use store::{FederationStateStore, MemoryStateStore};

pub use types::{
    ApplicationId, SubClusterId, SubClusterInfo, SubClusterPolicyConfiguration, SubClusterState,
};

//! Caching subsystem.
//!
//! - [`key`]: deterministic, collision-free key construction.
//! - [`request`]: entry model, a [`CacheRequest`] describing a query
//!   and the [`CacheResponse`] that answered it.
//! - [`FederationCache`]: the read-through orchestrator over a
//!   [`FederationStateStore`](crate::store::FederationStateStore), backed
//!   by a moka LRU + TTL store.

mod config;
mod federation;
pub mod key;
pub mod request;

pub use config::{CacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_SCOPE, DEFAULT_TTL_SECS, MAX_TTL};
pub use federation::{EntryStore, FederationCache};
pub use key::{CacheKey, QueryKind, build_cache_key};
pub use request::{CacheRequest, CacheResponse, CollectionResponse, ScalarResponse};

//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus,
//! statsd); without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `federation_cache_`. Counters end in
//! `_total`.
//!
//! # Common labels
//!
//! - `query`: query kind (e.g. "SUBCLUSTERS", "APP_HOME_SUBCLUSTER")

/// Lookups answered from the cache.
///
/// Labels: `query`.
pub const CACHE_HITS_TOTAL: &str = "federation_cache_hits_total";

/// Lookups that went to the state store and populated the cache.
///
/// Labels: `query`.
pub const CACHE_MISSES_TOTAL: &str = "federation_cache_misses_total";

/// Queries sent straight to the state store because caching is disabled.
///
/// Labels: `query`.
pub const CACHE_PASSTHROUGH_TOTAL: &str = "federation_cache_passthrough_total";

/// Explicit invalidations.
///
/// Labels: `query`.
pub const CACHE_INVALIDATIONS_TOTAL: &str = "federation_cache_invalidations_total";

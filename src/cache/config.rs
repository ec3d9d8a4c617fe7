//! Cache configuration.

use std::time::Duration;

/// Default scope name for a cache instance.
pub const DEFAULT_SCOPE: &str = "FederationCache";

/// Default entry lifetime: 5 minutes.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default maximum number of cached entries.
pub const DEFAULT_MAX_ENTRIES: u64 = 1_000;

/// Longest entry lifetime the backing store accepts: 1000 years.
pub const MAX_TTL: Duration = Duration::from_secs(1_000 * 365 * 24 * 3600);

/// Configuration for a [`FederationCache`](super::FederationCache).
///
/// Caching is enabled only when `ttl` is non-zero and at most [`MAX_TTL`],
/// and `max_entries` is non-zero. Anything else turns every query into a
/// direct state-store call.
///
/// ```rust
/// # use federation_cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .scope("router-1")
///     .max_entries(1_000)
///     .ttl(Duration::from_secs(60));
/// assert!(config.is_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Namespace for keys. Distinguishes cache instances that could
    /// otherwise share a backing provider. Default: `"FederationCache"`.
    pub scope: String,
    /// Lifetime of an entry, measured from insertion. Default: 5 minutes.
    pub ttl: Duration,
    /// Maximum cached entries. Default: 1,000.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            scope: DEFAULT_SCOPE.to_string(),
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables caching.
    pub fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Set the key scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Set the entry lifetime.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the entry lifetime in whole seconds. Zero or negative disables
    /// caching.
    pub fn ttl_secs(mut self, secs: i64) -> Self {
        self.ttl = u64::try_from(secs)
            .map(Duration::from_secs)
            .unwrap_or(Duration::ZERO);
        self
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Whether this configuration turns caching on.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.ttl <= MAX_TTL && self.max_entries > 0
    }
}

//! Cache key construction.
//!
//! A key is derived from `(scope, kind, params)`. Every segment is written
//! as `<byte length>:<value>` and segments are joined with `|`:
//!
//! ```text
//! 8:router-1|11:SUBCLUSTERS|4:true
//! ```
//!
//! The length prefix fixes where each segment ends, so the encoding can be
//! read back unambiguously: different tuples (including tuples with a
//! different number of params, or params containing `|`, `:` or `_`) never
//! produce the same key.

use std::fmt;

/// The query a cache entry answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Listing of all sub-clusters (optionally active-only).
    SubClusters,
    /// Map of queue → policy configuration.
    PoliciesConfigurations,
    /// Home sub-cluster of a single application.
    AppHomeSubCluster,
}

impl QueryKind {
    /// Stable name used in keys and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::SubClusters => "SUBCLUSTERS",
            QueryKind::PoliciesConfigurations => "POLICIES_CONFIGURATIONS",
            QueryKind::AppHomeSubCluster => "APP_HOME_SUBCLUSTER",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key under which one query result is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the key for `kind` with `params` inside `scope`.
///
/// Pure and total: any string, including the empty string, is a valid
/// scope or param.
pub fn build_cache_key(scope: &str, kind: QueryKind, params: &[&str]) -> CacheKey {
    let capacity = scope.len()
        + kind.as_str().len()
        + params.iter().map(|p| p.len() + 8).sum::<usize>()
        + 16;
    let mut key = String::with_capacity(capacity);
    push_segment(&mut key, scope);
    push_segment(&mut key, kind.as_str());
    for param in params {
        push_segment(&mut key, param);
    }
    CacheKey(key)
}

fn push_segment(key: &mut String, segment: &str) {
    if !key.is_empty() {
        key.push('|');
    }
    key.push_str(&segment.len().to_string());
    key.push(':');
    key.push_str(segment);
}

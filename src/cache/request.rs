//! Cache entry model.
//!
//! One store holds every query shape. A [`CacheRequest`] records what was
//! asked (scope, kind, params, key) and owns the [`CacheResponse`] that
//! answered it. Responses are a tagged union over result shapes so a reader
//! matches on the variant it expects instead of casting.
//!
//! Entries are built once per miss and shared as `Arc<CacheRequest>`; a
//! stale entry is replaced wholesale, never patched.

use std::collections::HashMap;

use super::key::{CacheKey, QueryKind, build_cache_key};
use crate::types::{SubClusterId, SubClusterInfo, SubClusterPolicyConfiguration};

/// Collection-shaped results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionResponse {
    SubClusters(HashMap<SubClusterId, SubClusterInfo>),
    PolicyConfigurations(HashMap<String, SubClusterPolicyConfiguration>),
}

/// Single-value results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarResponse {
    HomeSubCluster(SubClusterId),
}

/// Materialized result of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResponse {
    Collection(CollectionResponse),
    Scalar(ScalarResponse),
}

impl CacheResponse {
    /// The sub-cluster map, if this is a sub-cluster listing.
    pub fn sub_clusters(&self) -> Option<&HashMap<SubClusterId, SubClusterInfo>> {
        match self {
            CacheResponse::Collection(CollectionResponse::SubClusters(m)) => Some(m),
            _ => None,
        }
    }

    /// The policy map, if this is a policy listing.
    pub fn policy_configurations(&self) -> Option<&HashMap<String, SubClusterPolicyConfiguration>> {
        match self {
            CacheResponse::Collection(CollectionResponse::PolicyConfigurations(m)) => Some(m),
            _ => None,
        }
    }

    /// The home sub-cluster, if this is an application lookup.
    pub fn home_sub_cluster(&self) -> Option<&SubClusterId> {
        match self {
            CacheResponse::Scalar(ScalarResponse::HomeSubCluster(id)) => Some(id),
            _ => None,
        }
    }

    /// Number of items carried (1 for scalars).
    pub fn len(&self) -> usize {
        match self {
            CacheResponse::Collection(CollectionResponse::SubClusters(m)) => m.len(),
            CacheResponse::Collection(CollectionResponse::PolicyConfigurations(m)) => m.len(),
            CacheResponse::Scalar(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A cached query: the request that produced an entry plus its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRequest {
    scope: String,
    kind: QueryKind,
    params: Vec<String>,
    key: CacheKey,
    response: CacheResponse,
}

impl CacheRequest {
    /// Wrap `response` as the answer to `(scope, kind, params)`.
    pub fn new(scope: &str, kind: QueryKind, params: &[&str], response: CacheResponse) -> Self {
        Self {
            scope: scope.to_string(),
            kind,
            params: params.iter().map(|p| p.to_string()).collect(),
            key: build_cache_key(scope, kind, params),
            response,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Key this request is stored under.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn response(&self) -> &CacheResponse {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubClusterState;

    fn sub_cluster_listing() -> CacheResponse {
        let info = SubClusterInfo::new("SC-1", SubClusterState::Running);
        CacheResponse::Collection(CollectionResponse::SubClusters(HashMap::from([(
            info.sub_cluster_id.clone(),
            info,
        )])))
    }

    #[test]
    fn accessors_match_only_their_shape() {
        let listing = sub_cluster_listing();
        assert_eq!(listing.sub_clusters().map(HashMap::len), Some(1));
        assert!(listing.policy_configurations().is_none());
        assert!(listing.home_sub_cluster().is_none());

        let scalar = CacheResponse::Scalar(ScalarResponse::HomeSubCluster("SC-2".into()));
        assert_eq!(scalar.home_sub_cluster(), Some(&SubClusterId::new("SC-2")));
        assert!(scalar.sub_clusters().is_none());
        assert_eq!(scalar.len(), 1);
    }

    #[test]
    fn request_key_matches_builder() {
        let request = CacheRequest::new(
            "router-1",
            QueryKind::SubClusters,
            &["true"],
            sub_cluster_listing(),
        );
        assert_eq!(
            request.key(),
            &build_cache_key("router-1", QueryKind::SubClusters, &["true"])
        );
        assert_eq!(request.scope(), "router-1");
        assert_eq!(request.kind(), QueryKind::SubClusters);
        assert_eq!(request.params(), ["true".to_string()]);
    }

    #[test]
    fn empty_collection_is_empty() {
        let empty =
            CacheResponse::Collection(CollectionResponse::PolicyConfigurations(HashMap::new()));
        assert!(empty.is_empty());
        assert!(empty.policy_configurations().is_some());
    }
}

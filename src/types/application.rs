//! Application identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::FederationError;

const PREFIX: &str = "application";

/// Identifier of a submitted application: the cluster start timestamp plus
/// a per-cluster sequence number.
///
/// Renders as `application_<timestamp>_<id>` with the id zero-padded to at
/// least four digits, e.g. `application_1700000000000_0042`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationId {
    pub cluster_timestamp: u64,
    pub id: u32,
}

impl ApplicationId {
    pub fn new(cluster_timestamp: u64, id: u32) -> Self {
        Self {
            cluster_timestamp,
            id,
        }
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}_{}_{:04}", self.cluster_timestamp, self.id)
    }
}

impl FromStr for ApplicationId {
    type Err = FederationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FederationError::InvalidInput(format!("invalid application id: {s:?}"));

        let mut parts = s.split('_');
        if parts.next() != Some(PREFIX) {
            return Err(invalid());
        }
        let cluster_timestamp = parts
            .next()
            .and_then(|p| p.parse::<u64>().ok())
            .ok_or_else(invalid)?;
        let id = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(cluster_timestamp, id))
    }
}

impl Serialize for ApplicationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApplicationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

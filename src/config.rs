//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. explicit path (e.g. `--config <path>`)
//! 2. `~/.fedcache/config.toml` (user)
//! 3. `/etc/fedcache/config.toml` (system)
//!
//! ```toml
//! [cache]
//! scope = "router-1"
//! time_to_live_secs = 60
//! entity_nums = 1000
//!
//! [state_store]
//! snapshot = "/var/lib/fedcache/state.toml"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::{CacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_SCOPE, DEFAULT_TTL_SECS};
use crate::{FederationError, Result};

/// File configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub state_store: StateStoreSection,
}

/// `[cache]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Key scope (default: "FederationCache").
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Entry lifetime in seconds; zero or negative disables caching
    /// (default: 300).
    #[serde(default = "default_ttl_secs")]
    pub time_to_live_secs: i64,
    /// Maximum cached entries (default: 1000).
    #[serde(default = "default_entity_nums")]
    pub entity_nums: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            time_to_live_secs: default_ttl_secs(),
            entity_nums: default_entity_nums(),
        }
    }
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_ttl_secs() -> i64 {
    DEFAULT_TTL_SECS as i64
}

fn default_entity_nums() -> u64 {
    DEFAULT_MAX_ENTRIES
}

/// `[state_store]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateStoreSection {
    /// TOML snapshot used to seed an in-memory state store.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.fedcache/config.toml`
    /// 3. `/etc/fedcache/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path, &Self::standard_paths())? {
            Some(path) => Self::read(&path),
            None => Err(FederationError::Configuration(
                "No config file found. Create ~/.fedcache/config.toml or /etc/fedcache/config.toml"
                    .to_string(),
            )),
        }
    }

    /// Like [`load`](Self::load), but falls back to defaults when no file
    /// exists in the standard locations. An explicit path must exist.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_or_default_from(explicit_path, &Self::standard_paths())
    }

    /// The cache settings as a [`CacheConfig`].
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .scope(self.cache.scope.clone())
            .ttl_secs(self.cache.time_to_live_secs)
            .max_entries(self.cache.entity_nums)
    }

    fn load_or_default_from(explicit: Option<&Path>, candidates: &[PathBuf]) -> Result<Self> {
        match Self::resolve_config_path(explicit, candidates)? {
            Some(path) => Self::read(&path),
            None => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FederationError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            FederationError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// User then system config locations.
    fn standard_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(2);
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".fedcache").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/fedcache/config.toml"));
        paths
    }

    /// Resolve the config file path. A missing explicit path is an error;
    /// `None` means no standard location has a file.
    fn resolve_config_path(
        explicit: Option<&Path>,
        candidates: &[PathBuf],
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(FederationError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(candidates.iter().find(|path| path.exists()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.cache.scope, "FederationCache");
        assert_eq!(config.cache.time_to_live_secs, 300);
        assert_eq!(config.cache.entity_nums, 1000);
        assert!(config.state_store.snapshot.is_none());
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [cache]
            scope = "router-1"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.scope, "router-1");
        // Defaults preserved
        assert_eq!(config.cache.time_to_live_secs, 300);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [cache]
            scope = "router-1"
            time_to_live_secs = 60
            entity_nums = 1000

            [state_store]
            snapshot = "/var/lib/fedcache/state.toml"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let cache = config.cache_config();
        assert_eq!(cache.scope, "router-1");
        assert_eq!(cache.ttl, Duration::from_secs(60));
        assert_eq!(cache.max_entries, 1000);
        assert_eq!(
            config.state_store.snapshot,
            Some(PathBuf::from("/var/lib/fedcache/state.toml"))
        );
    }

    #[test]
    fn negative_ttl_disables_cache() {
        let toml = r#"
            [cache]
            time_to_live_secs = -1
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.cache_config().is_enabled());
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn explicit_missing_path_is_not_defaulted() {
        let result = Config::load_or_default(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\ntime_to_live_secs = 0").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.cache.time_to_live_secs, 0);
        assert!(!config.cache_config().is_enabled());
    }

    #[test]
    fn unparseable_file_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache\nscope = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, FederationError::Configuration(_)));
    }

    #[test]
    fn no_standard_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = [dir.path().join("missing.toml")];

        let config = Config::load_or_default_from(None, &candidates).unwrap();
        assert_eq!(config.cache.scope, "FederationCache");
        assert!(config.cache_config().is_enabled());
    }

    #[test]
    fn first_existing_standard_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let system = dir.path().join("system.toml");
        fs::write(&user, "[cache]\nscope = \"user\"").unwrap();
        fs::write(&system, "[cache]\nscope = \"system\"").unwrap();

        let candidates = [dir.path().join("absent.toml"), user, system];
        let config = Config::load_or_default_from(None, &candidates).unwrap();
        assert_eq!(config.cache.scope, "user");
    }

    #[test]
    fn unreadable_standard_file_is_not_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        fs::write(&broken, "[cache\nscope = ").unwrap();

        let err = Config::load_or_default_from(None, &[broken]).unwrap_err();
        assert!(matches!(err, FederationError::Configuration(_)));
    }

    #[test]
    fn oversized_ttl_in_file_disables_cache() {
        let config: Config =
            toml::from_str("[cache]\ntime_to_live_secs = 9223372036854775807").unwrap();
        assert!(!config.cache_config().is_enabled());
    }
}

//! fedcache: query a federation state store snapshot through the cache.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use federation_cache::{
    ApplicationId, Config, FederationCache, FederationError, MemoryStateStore, SubClusterId,
};

/// Federation cache CLI
#[derive(Parser)]
#[command(name = "fedcache")]
#[command(version)]
#[command(about = "Query federation state through a read-through cache")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "FEDCACHE_CONFIG")]
    config: Option<PathBuf>,

    /// State store snapshot (overrides `[state_store] snapshot`).
    #[arg(short, long, env = "FEDCACHE_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Cache scope (overrides `[cache] scope`).
    #[arg(long)]
    scope: Option<String>,

    /// Entry lifetime in seconds; 0 disables caching.
    #[arg(long, allow_negative_numbers = true)]
    ttl_secs: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List sub-clusters
    SubClusters {
        /// Only running sub-clusters
        #[arg(long)]
        active_only: bool,
    },

    /// Show one sub-cluster
    SubCluster {
        /// Sub-cluster id
        id: String,
        /// Only consider running sub-clusters
        #[arg(long)]
        active_only: bool,
    },

    /// List policy configurations
    Policies,

    /// Show the policy for one queue
    Policy {
        /// Queue name
        queue: String,
    },

    /// Show the home sub-cluster of an application
    AppHome {
        /// Application id, e.g. application_1700000000000_0001
        app_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::load_or_default(args.config.as_deref())?;
    let mut cache_config = config.cache_config();
    if let Some(scope) = args.scope {
        cache_config = cache_config.scope(scope);
    }
    if let Some(ttl) = args.ttl_secs {
        cache_config = cache_config.ttl_secs(ttl);
    }

    let snapshot = args
        .snapshot
        .or(config.state_store.snapshot)
        .ok_or_else(|| {
            FederationError::Configuration(
                "No state store snapshot. Pass --snapshot or set [state_store] snapshot".into(),
            )
        })?;
    let store = MemoryStateStore::load(&snapshot)?;

    let cache = FederationCache::new(cache_config, Arc::new(store));
    info!(
        scope = %cache.config().scope,
        enabled = cache.is_caching_enabled(),
        "fedcache ready"
    );

    match args.command {
        Command::SubClusters { active_only } => {
            let sub_clusters = cache.get_sub_clusters(active_only).await?;
            let mut listing: Vec<_> = sub_clusters.into_values().collect();
            listing.sort_by(|a, b| a.sub_cluster_id.cmp(&b.sub_cluster_id));
            print_json(&listing)?;
        }
        Command::SubCluster { id, active_only } => {
            let info = cache
                .get_sub_cluster(&SubClusterId::new(id), active_only)
                .await?;
            print_json(&info)?;
        }
        Command::Policies => {
            let policies = cache.get_policies_configurations().await?;
            let mut listing: Vec<_> = policies.into_values().collect();
            listing.sort_by(|a, b| a.queue.cmp(&b.queue));
            print_json(&listing)?;
        }
        Command::Policy { queue } => {
            let policy = cache.get_policy_configuration(&queue).await?;
            print_json(&policy)?;
        }
        Command::AppHome { app_id } => {
            let app: ApplicationId = app_id.parse()?;
            let home = cache.get_application_home_sub_cluster(&app).await?;
            print_json(&serde_json::json!({
                "application_id": app,
                "home_sub_cluster": home,
            }))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

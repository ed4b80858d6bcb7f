//! Federated query CLI.
//!
//! Resolves metric queries and fetches series data across every configured
//! remote backend, demonstrating the fan-out composition the library leaves
//! to callers: dispatch a lookup to every available backend, then collect
//! each in turn.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metric_federation::{
    FetchOutcome, FindCache, FindOptions, MetricNode, PathNode, RemoteBackend,
};

#[derive(Parser)]
#[command(name = "metric-federation")]
#[command(about = "Query federated remote metric stores", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "federation.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a metric-name query against every available backend
    Find {
        query: String,

        /// Only report leaf paths
        #[arg(long)]
        leaves_only: bool,
    },
    /// Fetch series data for a concrete leaf path
    Fetch {
        path: String,

        /// Window start (unix seconds)
        #[arg(long)]
        from: i64,

        /// Window end (unix seconds)
        #[arg(long)]
        until: i64,

        /// Reference time forwarded to the backend (unix seconds)
        #[arg(long)]
        now: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = metric_federation::config::load_config(&cli.config)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("metric_federation={}", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backends = RemoteBackend::from_config(&config);
    tracing::info!(backends = backends.len(), "configuration loaded");

    match cli.command {
        Commands::Find { query, leaves_only } => {
            let cache = FindCache::new();
            let options = FindOptions::from_config(&config).leaves_only(leaves_only);

            // Dispatch to every available backend before collecting from any,
            // so the network exchanges overlap.
            let mut requests: Vec<_> = backends
                .iter()
                .filter(|backend| backend.is_available())
                .map(|backend| backend.find(&query, &cache, options.clone()))
                .collect();

            for request in &mut requests {
                let host = request.backend().host().to_string();
                let nodes = request.collect().await?;
                for node in &nodes {
                    let kind = if node.is_leaf() { "leaf" } else { "branch" };
                    println!("{host}: {} ({kind})", node.metric_path());
                }
                if nodes.is_empty() {
                    tracing::debug!(host, "no matches");
                }
            }
        }
        Commands::Fetch {
            path,
            from,
            until,
            now,
        } => {
            for backend in backends.iter().filter(|backend| backend.is_available()) {
                let node = PathNode::new(Arc::clone(backend), path.clone(), true);
                match node.fetch(from, until, now).await {
                    Ok(FetchOutcome::Data(series)) => {
                        let window = series.window;
                        println!(
                            "{}: [{}, {}) step {}",
                            backend.host(),
                            window.start,
                            window.end,
                            window.step
                        );
                        for (i, value) in series.values.iter().enumerate() {
                            let t = window.start + i as i64 * window.step;
                            match value {
                                Some(v) => println!("  {t} {v}"),
                                None => println!("  {t} -"),
                            }
                        }
                    }
                    Ok(FetchOutcome::NoData) => {
                        tracing::info!(host = backend.host(), "backend has no data for {path}");
                    }
                    Ok(FetchOutcome::NotFetchable) => {}
                    Err(err) => {
                        tracing::error!(host = backend.host(), error = %err, "fetch failed");
                    }
                }
            }
        }
    }

    Ok(())
}

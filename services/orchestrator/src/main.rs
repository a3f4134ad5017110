//! `mano-orchestrator`: a single-shot CLI that submits one intent through
//! the full pipeline (parse, place, deploy, activate) and prints the
//! resulting slice report.

mod agents;
mod pipeline;
mod sites;

use clap::Parser;
use mano_config::{Config, SharedConfig};
use mano_tn_manager::{FaultDetector, TcpTnAgentClient, TnManager};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Submit a natural-language slice intent to the MANO pipeline.
#[derive(Debug, Parser)]
#[command(name = "mano-orchestrator", about = "Intent-driven O-RAN slice orchestration")]
struct Args {
    /// Natural-language slice intent, e.g. "Emergency ambulance dispatch".
    text: String,

    /// Path to the process configuration (placement weights, timeouts, thesis targets).
    #[arg(long, default_value = "config/mano.toml")]
    config: PathBuf,

    /// Path to the site/endpoint inventory.
    #[arg(long, default_value = "config/sites.toml")]
    sites: PathBuf,

    /// Path to the TN agent roster (cluster name -> address).
    #[arg(long, default_value = "config/agents.toml")]
    agents: PathBuf,

    /// Seconds to wait for a TCP connection to a TN agent.
    #[arg(long, default_value_t = 2)]
    agent_connect_timeout_secs: u64,

    /// Seconds to wait for any single agent RPC to complete.
    #[arg(long, default_value_t = 5)]
    agent_call_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_env("MANO_LOG").unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load(Some(&args.config), None)?;
    let config = Arc::new(config);

    let catalog = sites::SiteCatalog::load(Some(&args.sites))?;
    let vni_pool = mano_placement::VniPool::new(config.placement.vni_range_start, config.placement.vni_range_end);

    let metrics_provider = catalog.metrics_provider(0.1, 0.01).await;
    let ticker = metrics_provider.clone().spawn_ticker(Duration::from_secs(5));

    let tn_manager = Arc::new(TnManager::new(SharedConfig::new((*config).clone()), FaultDetector::new(Default::default(), 64)));

    let pool = mano_net::ConnectionPool::new(Duration::from_secs(args.agent_connect_timeout_secs));
    let roster = agents::load(Some(&args.agents));
    tracing::info!(count = roster.len(), "loaded tn agent roster");
    for entry in roster {
        let client = Arc::new(TcpTnAgentClient::new(entry.addr.clone(), pool.clone(), Duration::from_secs(args.agent_call_timeout_secs)));
        if let Err(err) = tn_manager.register(entry.cluster.clone(), client).await {
            tracing::warn!(cluster = %entry.cluster, %err, "failed to register tn agent, continuing without it");
        }
    }

    let fault_watch = {
        let tn_manager = tn_manager.clone();
        let metrics_provider = metrics_provider.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(5)).await;
                tn_manager.inspect_sites(metrics_provider.as_ref()).await;
            }
        })
    };

    let report = pipeline::run_intent(&args.text, config, &catalog, &vni_pool, &tn_manager, Some(metrics_provider.as_ref())).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    ticker.abort();
    fault_watch.abort();
    tn_manager.stop().await.ok();
    Ok(())
}

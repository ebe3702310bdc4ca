use alloy_network::AnyNetwork;
use alloy_provider::ProviderBuilder;
use anyhow::{anyhow, Result};
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};
use url::Url;

use sanctions_snapshot::metrics::Metrics;
use sanctions_snapshot::reconciler::{self, rpc::RpcReceiptSource};
use sanctions_snapshot::storage;
use sanctions_snapshot::utils::retry::RetryConfig;
use sanctions_snapshot::utils::{load_config, load_transaction_list};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    println!();
    info!("=========================== INITIALIZING ===========================");

    // Load config
    let config = match load_config("config.yml") {
        Ok(config) => {
            info!("Config loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(anyhow!(e));
        }
    };

    // Load the ordered transaction list. A malformed list fails the run
    // before any fetch is attempted.
    let tx_hashes = load_transaction_list(&config.transactions_file)?;
    info!(
        "Loaded {} transaction(s) from {}",
        tx_hashes.len(),
        config.transactions_file
    );

    // Initialize optional metrics
    let metrics = if config.metrics.enabled {
        Some(Metrics::new()?)
    } else {
        info!("Metrics are disabled");
        None
    };

    // Start metrics server if metrics are enabled
    if let Some(metrics_instance) = &metrics {
        metrics_instance
            .start_metrics_server(&config.metrics.address, config.metrics.port)
            .await;
    }

    // Create RPC provider
    let rpc_url: Url = config.rpc_url.parse()?;
    info!("RPC URL: {:?}", config.rpc_url);
    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(rpc_url);

    let fetcher = RpcReceiptSource::new(
        provider,
        Duration::from_millis(config.request_timeout_ms),
        RetryConfig::with_max_attempts(config.max_retry_attempts),
    );

    println!();
    info!("======================= STARTING RECONCILIATION ====================");

    // A snapshot is only valid if every input transaction reached a terminal
    // outcome, so an operator abort discards the partial run instead of
    // persisting it.
    let report = tokio::select! {
        report = reconciler::reconcile(
            &fetcher,
            &tx_hashes,
            config.max_concurrent_requests,
            metrics.as_ref(),
        ) => report,
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, discarding partial run without writing a snapshot");
            return Ok(());
        }
    };

    info!(
        "Run complete: {} successful, {} failed, {} sanction event(s)",
        report.successes.len(),
        report.failures.len(),
        report.events.len()
    );
    if !report.failures.is_empty() {
        warn!(
            "{} transaction(s) failed; the net set is based on incomplete ledger data",
            report.failures.len()
        );
    }

    storage::save_snapshot(&report, &config.output_file)?;

    // Echo the net set for the operator
    let net = report.net_addresses_sorted();
    if net.is_empty() {
        info!("No net sanctioned addresses found");
    } else {
        info!("Net sanctioned addresses:");
        for address in &net {
            info!("  {}", address);
        }
    }

    Ok(())
}

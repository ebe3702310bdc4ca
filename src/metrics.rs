use std::sync::Arc;
use tracing::info;

use axum::{routing::get, Router};
use opentelemetry::metrics::{Counter, Gauge, Histogram, MeterProvider};
use opentelemetry_sdk::metrics::{MetricError, SdkMeterProvider};
use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;

pub struct Metrics {
    registry: Arc<prometheus::Registry>,
    _provider: SdkMeterProvider,

    // Reconciliation metrics
    pub transactions_processed: Counter<u64>,
    pub transactions_failed: Counter<u64>,
    pub sanction_events_decoded: Counter<u64>,
    pub net_sanctioned_addresses: Gauge<u64>,

    // RPC metrics
    pub rpc_requests: Counter<u64>,
    pub rpc_errors: Counter<u64>,
    pub rpc_latency: Histogram<f64>,
}

impl Metrics {
    pub fn new() -> Result<Self, MetricError> {
        // Create a new prometheus registry
        let registry = prometheus::Registry::new();

        // Configure OpenTelemetry to use this registry
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()?;

        // Set up a meter to create instruments
        let provider = SdkMeterProvider::builder().with_reader(exporter).build();
        let meter = provider.meter("reconciler_metrics");

        let transactions_processed = meter
            .u64_counter("reconciler_transactions_processed")
            .with_description("Total number of input transactions processed")
            .build();

        let transactions_failed = meter
            .u64_counter("reconciler_transactions_failed")
            .with_description("Number of input transactions that ended in a failure outcome")
            .build();

        let sanction_events_decoded = meter
            .u64_counter("reconciler_sanction_events_decoded")
            .with_description("Number of sanction events decoded from receipt logs")
            .build();

        let net_sanctioned_addresses = meter
            .u64_gauge("reconciler_net_sanctioned_addresses")
            .with_description("Size of the net sanctioned-address set after the run")
            .build();

        let rpc_requests = meter
            .u64_counter("reconciler_rpc_requests")
            .with_description("Number of RPC requests made")
            .build();

        let rpc_errors = meter
            .u64_counter("reconciler_rpc_errors")
            .with_description("Number of RPC errors encountered")
            .build();

        let rpc_latency = meter
            .f64_histogram("reconciler_rpc_latency")
            .with_description("RPC request latency")
            .with_boundaries(vec![
                0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 1.0, 5.0, 10.0,
            ])
            .with_unit("s")
            .build();

        Ok(Self {
            registry: Arc::new(registry),
            _provider: provider,
            transactions_processed,
            transactions_failed,
            sanction_events_decoded,
            net_sanctioned_addresses,
            rpc_requests,
            rpc_errors,
            rpc_latency,
        })
    }

    pub async fn start_metrics_server(&self, addr: &str, port: u16) {
        let addr = format!("{addr}:{port}").parse::<SocketAddr>().unwrap();
        let registry = self.registry.clone();

        let app = Router::new().route("/metrics", get(move || metrics_handler(registry.clone())));

        // Determine the access URL based on the binding address. Only used for logging.
        let access_url = if addr.ip().to_string() == "0.0.0.0" {
            format!("http://localhost:{port}/metrics")
        } else {
            format!("http://{}:{port}/metrics", addr.ip())
        };

        info!(
            "Starting metrics server - binding to {} (accessible at {})",
            addr, access_url
        );

        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

        // Spawn the server in a separate task
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
    }
}

async fn metrics_handler(registry: Arc<prometheus::Registry>) -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

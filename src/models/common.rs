use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    pub transactions_file: String,
    pub output_file: String,
    pub max_concurrent_requests: usize,
    pub request_timeout_ms: u64,
    pub max_retry_attempts: u32,
    pub metrics: MetricsConfig,
}

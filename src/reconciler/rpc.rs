use alloy_network::{AnyNetwork, AnyTransactionReceipt};
use alloy_primitives::FixedBytes;
use alloy_provider::Provider;
use anyhow::{anyhow, Result};
use opentelemetry::KeyValue;
use std::time::Duration;
use tracing::warn;

use crate::metrics::Metrics;
use crate::models::logs::{RawLogData, TransactionReceiptData};
use crate::utils::retry::{retry, RetryConfig};

/// Source of transaction receipts. The engine only depends on this seam, so
/// tests drive it with an in-memory implementation instead of a live node.
#[allow(async_fn_in_trait)]
pub trait ReceiptFetcher {
    /// `Ok(None)` means the node does not know the transaction, which is
    /// distinct from a transport error.
    async fn fetch_receipt(
        &self,
        tx_hash: FixedBytes<32>,
        metrics: Option<&Metrics>,
    ) -> Result<Option<TransactionReceiptData>>;
}

/// Receipt source backed by an alloy provider, with per-request timeout and
/// jittered retry.
pub struct RpcReceiptSource<P> {
    provider: P,
    request_timeout: Duration,
    retry_config: RetryConfig,
}

impl<P: Provider<AnyNetwork>> RpcReceiptSource<P> {
    pub fn new(provider: P, request_timeout: Duration, retry_config: RetryConfig) -> Self {
        Self {
            provider,
            request_timeout,
            retry_config,
        }
    }
}

impl<P: Provider<AnyNetwork>> ReceiptFetcher for RpcReceiptSource<P> {
    async fn fetch_receipt(
        &self,
        tx_hash: FixedBytes<32>,
        metrics: Option<&Metrics>,
    ) -> Result<Option<TransactionReceiptData>> {
        let receipt = retry(
            || async {
                let start = std::time::Instant::now();

                // Record metrics if enabled
                if let Some(metrics) = metrics {
                    metrics.rpc_requests.add(
                        1,
                        &[KeyValue::new("method", "get_transaction_receipt")],
                    );
                }

                let result = match tokio::time::timeout(
                    self.request_timeout,
                    self.provider.get_transaction_receipt(tx_hash),
                )
                .await
                {
                    Ok(inner) => inner.map_err(|e| anyhow!("RPC error: {}", e)),
                    Err(_) => Err(anyhow!(
                        "Request timed out after {}ms",
                        self.request_timeout.as_millis()
                    )),
                };

                // Record metrics if enabled
                if let Some(metrics) = metrics {
                    metrics.rpc_latency.record(
                        start.elapsed().as_secs_f64(),
                        &[KeyValue::new("method", "get_transaction_receipt")],
                    );
                    if result.is_err() {
                        metrics.rpc_errors.add(
                            1,
                            &[KeyValue::new("method", "get_transaction_receipt")],
                        );
                    }
                }

                result.map_err(|e| {
                    warn!("Failed to get receipt for {}: {}", tx_hash, e);
                    e
                })
            },
            &self.retry_config,
            "get_transaction_receipt",
        )
        .await?;

        Ok(receipt.map(|receipt| parse_receipt(tx_hash, &receipt)))
    }
}

// Project the RPC receipt envelope down to the fields the reconciler reads.
fn parse_receipt(
    tx_hash: FixedBytes<32>,
    receipt: &AnyTransactionReceipt,
) -> TransactionReceiptData {
    // Access the inner ReceiptWithBloom through the AnyReceiptEnvelope
    let receipt_with_bloom = &receipt.inner.inner.inner;

    let logs = receipt_with_bloom
        .receipt
        .logs
        .iter()
        .map(|log| RawLogData {
            address: log.inner.address,
            topics: log.inner.data.topics().to_vec(),
            data: log.inner.data.data.clone(),
            block_number: log.block_number,
            tx_hash: log.transaction_hash,
            log_index: log.log_index,
        })
        .collect();

    TransactionReceiptData {
        tx_hash,
        block_number: receipt.inner.block_number,
        logs,
    }
}

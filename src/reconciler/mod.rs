pub mod classify;
pub mod decode;
pub mod rpc;
pub mod topics;

use alloy_primitives::{Address, FixedBytes};
use futures::{stream, StreamExt};
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::metrics::Metrics;
use crate::models::logs::TransactionReceiptData;
use crate::models::report::{
    EventKind, ReconciliationReport, SanctionEvent, TransactionFailure, TransactionOutcome,
    TransactionSuccess,
};
use crate::reconciler::rpc::ReceiptFetcher;

/// Classify every log of a receipt, in original log order, keeping the
/// recognized sanction events. A decode failure on a recognized topic fails
/// the whole transaction so the net set is never silently short.
pub fn classify_receipt(receipt: &TransactionReceiptData) -> TransactionOutcome {
    let mut events = Vec::new();
    for log in &receipt.logs {
        match classify::classify_log(log) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(e) => {
                let index = log
                    .log_index
                    .map(|i| i.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                return TransactionOutcome::Failure(TransactionFailure::new(
                    receipt.tx_hash,
                    format!("Decode error at log index {}: {}", index, e),
                ));
            }
        }
    }
    TransactionOutcome::Success(TransactionSuccess {
        tx_hash: receipt.tx_hash,
        block_number: receipt.block_number,
        sanction_events: events,
    })
}

/// Fetch and classify one transaction. Failures are isolated: they become
/// data in the report, never an error that aborts the run.
pub async fn process_transaction<F: ReceiptFetcher>(
    fetcher: &F,
    tx_hash: FixedBytes<32>,
    metrics: Option<&Metrics>,
) -> TransactionOutcome {
    match fetcher.fetch_receipt(tx_hash, metrics).await {
        Ok(Some(receipt)) => classify_receipt(&receipt),
        Ok(None) => TransactionOutcome::Failure(TransactionFailure::new(
            tx_hash,
            "Transaction not found".to_string(),
        )),
        Err(e) => TransactionOutcome::Failure(TransactionFailure::new(tx_hash, e.to_string())),
    }
}

/// Apply events to a running net set: Added inserts, Removed deletes.
/// Removing an absent address is a no-op.
pub fn fold_into(net: &mut BTreeSet<Address>, events: &[SanctionEvent]) {
    for event in events {
        match event.kind {
            EventKind::Added => {
                for address in &event.addresses {
                    net.insert(*address);
                }
            }
            EventKind::Removed => {
                for address in &event.addresses {
                    net.remove(address);
                }
            }
        }
    }
}

/// Pure fold of an event sequence into a net set, starting empty.
pub fn fold_events(events: &[SanctionEvent]) -> BTreeSet<Address> {
    let mut net = BTreeSet::new();
    fold_into(&mut net, events);
    net
}

/// Drive the full run. Receipt fetches may overlap up to `max_in_flight`,
/// but `buffered` yields outcomes in input-list order, so events are always
/// folded in the caller-supplied chronological order.
pub async fn reconcile<F: ReceiptFetcher>(
    fetcher: &F,
    tx_hashes: &[FixedBytes<32>],
    max_in_flight: usize,
    metrics: Option<&Metrics>,
) -> ReconciliationReport {
    let mut report = ReconciliationReport::default();

    let mut outcomes = stream::iter(tx_hashes.iter().copied())
        .map(|tx_hash| process_transaction(fetcher, tx_hash, metrics))
        .buffered(max_in_flight.max(1));

    while let Some(outcome) = outcomes.next().await {
        if let Some(metrics) = metrics {
            metrics.transactions_processed.add(1, &[]);
        }
        match outcome {
            TransactionOutcome::Success(success) => {
                info!(
                    "Processed {} (block {:?}): {} sanction event(s)",
                    success.tx_hash,
                    success.block_number,
                    success.sanction_events.len()
                );
                if let Some(metrics) = metrics {
                    metrics
                        .sanction_events_decoded
                        .add(success.sanction_events.len() as u64, &[]);
                }
                fold_into(&mut report.net_addresses, &success.sanction_events);
                report.events.extend(success.sanction_events.iter().cloned());
                report.successes.push(success);
            }
            TransactionOutcome::Failure(failure) => {
                warn!("Transaction {} failed: {}", failure.tx_hash, failure.error);
                if let Some(metrics) = metrics {
                    metrics.transactions_failed.add(1, &[]);
                }
                report.failures.push(failure);
            }
        }
    }

    if let Some(metrics) = metrics {
        metrics
            .net_sanctioned_addresses
            .record(report.net_addresses.len() as u64, &[]);
    }

    report
}

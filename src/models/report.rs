use alloy_primitives::{Address, FixedBytes};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// The two event encodings the reconciler understands. Serialized variant
/// names match the on-chain event names, which downstream tooling keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    #[serde(rename = "SanctionedAddressesAdded")]
    Added,
    #[serde(rename = "SanctionedAddressesRemoved")]
    Removed,
}

// Addresses are compared on raw bytes but rendered EIP-55 checksummed in the
// snapshot artifact.
fn serialize_checksummed<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&address.to_checksum(None))
}

fn serialize_checksummed_list<S>(addresses: &[Address], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(addresses.iter().map(|address| address.to_checksum(None)))
}

/// One decoded sanction event. Ordering across the run follows the position
/// of the owning transaction in the input list, then the log's original
/// position within its receipt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanctionEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(serialize_with = "serialize_checksummed")]
    pub contract_address: Address,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<FixedBytes<32>>,
    pub log_index: Option<u64>,
    #[serde(serialize_with = "serialize_checksummed_list")]
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSuccess {
    pub tx_hash: FixedBytes<32>,
    pub block_number: Option<u64>,
    pub sanction_events: Vec<SanctionEvent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFailure {
    pub tx_hash: FixedBytes<32>,
    pub error: String,
    // Always empty; kept so failure entries carry the same fields as
    // successes in the artifact.
    pub sanction_events: Vec<SanctionEvent>,
}

impl TransactionFailure {
    pub fn new(tx_hash: FixedBytes<32>, error: String) -> Self {
        Self {
            tx_hash,
            error,
            sanction_events: Vec::new(),
        }
    }
}

/// Terminal state of one input transaction. Every input hash lands in
/// exactly one of the two variants.
#[derive(Debug, Clone)]
pub enum TransactionOutcome {
    Success(TransactionSuccess),
    Failure(TransactionFailure),
}

/// Accumulated output of a reconciliation run. `net_addresses` is always the
/// fold of `events` (Added -> insert, Removed -> remove) in event order.
#[derive(Debug, Default)]
pub struct ReconciliationReport {
    pub successes: Vec<TransactionSuccess>,
    pub failures: Vec<TransactionFailure>,
    pub events: Vec<SanctionEvent>,
    pub net_addresses: BTreeSet<Address>,
}

impl ReconciliationReport {
    pub fn total_transactions(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Checksummed renderings of the net set, sorted lexicographically. The
    /// string sort (not byte order) is what snapshot consumers expect.
    pub fn net_addresses_sorted(&self) -> Vec<String> {
        let mut rendered: Vec<String> = self
            .net_addresses
            .iter()
            .map(|address| address.to_checksum(None))
            .collect();
        rendered.sort();
        rendered
    }
}

/////////////////////////////////// Snapshot ///////////////////////////////////
// Serialized artifact shape. Field names and nesting are a durable contract
// with downstream configuration tooling.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub total_transactions: usize,
    pub successful_transactions: usize,
    pub failed_transactions: usize,
    pub total_sanction_events: usize,
    pub net_sanctioned_addresses: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: String,
    pub summary: SnapshotSummary,
    pub net_sanctioned_addresses: Vec<String>,
    pub sanction_events: Vec<SanctionEvent>,
    pub successful: Vec<TransactionSuccess>,
    pub failed: Vec<TransactionFailure>,
}

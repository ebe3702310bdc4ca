use alloy_primitives::{Address, Bytes, FixedBytes};

/// One log entry as emitted by the ledger, projected out of the RPC receipt
/// envelope. Read-only once constructed.
#[derive(Debug, Clone)]
pub struct RawLogData {
    pub address: Address,
    pub topics: Vec<FixedBytes<32>>,
    pub data: Bytes,
    pub block_number: Option<u64>,
    pub tx_hash: Option<FixedBytes<32>>,
    pub log_index: Option<u64>,
}

/// The parts of a transaction receipt the reconciler consumes.
#[derive(Debug, Clone)]
pub struct TransactionReceiptData {
    pub tx_hash: FixedBytes<32>,
    pub block_number: Option<u64>,
    pub logs: Vec<RawLogData>,
}

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use std::{fs, path::Path};
use tracing::info;

use crate::models::report::{ReconciliationReport, Snapshot, SnapshotSummary};

/// Assemble the serializable snapshot from a finished run. Only complete
/// runs reach this point; a cancelled run is discarded before assembly.
pub fn build_snapshot(report: &ReconciliationReport) -> Snapshot {
    Snapshot {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        summary: SnapshotSummary {
            total_transactions: report.total_transactions(),
            successful_transactions: report.successes.len(),
            failed_transactions: report.failures.len(),
            total_sanction_events: report.events.len(),
            net_sanctioned_addresses: report.net_addresses.len(),
        },
        net_sanctioned_addresses: report.net_addresses_sorted(),
        sanction_events: report.events.clone(),
        successful: report.successes.clone(),
        failed: report.failures.clone(),
    }
}

/// Write the snapshot as pretty-printed JSON.
pub fn save_snapshot<P: AsRef<Path>>(report: &ReconciliationReport, path: P) -> Result<()> {
    let snapshot = build_snapshot(report);
    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
    fs::write(path.as_ref(), json).context("failed to write snapshot file")?;

    info!("Results saved to: {}", path.as_ref().to_string_lossy());
    info!(
        "Net sanctioned addresses: {}",
        snapshot.summary.net_sanctioned_addresses
    );
    Ok(())
}

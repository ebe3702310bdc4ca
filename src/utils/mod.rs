pub mod retry;

use alloy_primitives::FixedBytes;
use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::info;

use crate::models::common::Config;
use crate::models::errors::InputError;

pub fn load_config<P: AsRef<Path>>(file_name: P) -> Result<Config> {
    // Build the path to the config file
    let manifest_dir = env!("CARGO_MANIFEST_DIR").to_string();
    let config_path = Path::new(&manifest_dir).join(file_name);
    info!("Config path: {}", config_path.to_string_lossy());

    // Read the file contents to a string
    let contents = fs::read_to_string(config_path).context("failed to read config file")?;

    // Parse the YAML into our Config struct
    let config: Config = serde_yaml::from_str(&contents).context("failed to parse config YAML")?;

    Ok(config)
}

/// Load the ordered transaction list: one 0x-prefixed hash per line, blank
/// lines and `#` comments skipped. Any malformed line aborts the run before
/// processing begins.
pub fn load_transaction_list<P: AsRef<Path>>(path: P) -> Result<Vec<FixedBytes<32>>> {
    let contents =
        fs::read_to_string(path.as_ref()).context("failed to read transaction list")?;

    let mut hashes = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let hash = line.parse::<FixedBytes<32>>().map_err(|_| InputError::InvalidTxHash {
            line: index + 1,
            value: line.to_string(),
        })?;
        hashes.push(hash);
    }
    Ok(hashes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_list_rejects_malformed_lines() {
        let dir = std::env::temp_dir().join("sanctions-snapshot-test-input");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.txt");
        fs::write(&path, "0x1d3d64b26cfdaeb328d01d09b407f3a806d3254109e4476461b3960592eae902\nnot-a-hash\n").unwrap();
        assert!(load_transaction_list(&path).is_err());

        let path = dir.join("good.txt");
        fs::write(
            &path,
            "# chronological\n\n0x1d3d64b26cfdaeb328d01d09b407f3a806d3254109e4476461b3960592eae902\n",
        )
        .unwrap();
        assert_eq!(load_transaction_list(&path).unwrap().len(), 1);
    }
}

use crate::models::errors::DecodeError;
use crate::models::logs::RawLogData;
use crate::models::report::SanctionEvent;
use crate::reconciler::{decode::decode_address_array, topics};

/// Classify one log. `Ok(None)` means the log is unrelated to sanctions; a
/// recognized topic with a malformed payload is a hard decode error, never an
/// empty event.
pub fn classify_log(log: &RawLogData) -> Result<Option<SanctionEvent>, DecodeError> {
    let Some(topic0) = log.topics.first() else {
        return Ok(None);
    };
    let Some(kind) = topics::classify_topic(topic0) else {
        return Ok(None);
    };

    let addresses = decode_address_array(&log.data)?;

    Ok(Some(SanctionEvent {
        kind,
        contract_address: log.address,
        block_number: log.block_number,
        transaction_hash: log.tx_hash,
        log_index: log.log_index,
        addresses,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::EventKind;
    use alloy_primitives::{address, b256, keccak256, Address, Bytes};

    fn log_with(topic: alloy_primitives::B256, data: Vec<u8>) -> RawLogData {
        RawLogData {
            address: address!("0x40c57923924b5c5c5455c48d93317139addac8fb"),
            topics: vec![topic],
            data: Bytes::from(data),
            block_number: Some(14356508),
            tx_hash: Some(b256!(
                "0x1d3d64b26cfdaeb328d01d09b407f3a806d3254109e4476461b3960592eae902"
            )),
            log_index: Some(3),
        }
    }

    fn encoded(addresses: &[Address]) -> Vec<u8> {
        let mut out = vec![0u8; 32];
        out[31] = 32;
        let mut len_word = [0u8; 32];
        len_word[24..].copy_from_slice(&(addresses.len() as u64).to_be_bytes());
        out.extend_from_slice(&len_word);
        for addr in addresses {
            let mut slot = [0u8; 32];
            slot[12..].copy_from_slice(addr.as_slice());
            out.extend_from_slice(&slot);
        }
        out
    }

    #[test]
    fn recognized_topic_yields_event() {
        let sanctioned = address!("0x7f367cc41522ce07553e823bf3be79a889debe1b");
        let log = log_with(*topics::ADDED_TOPIC, encoded(&[sanctioned]));

        let event = classify_log(&log).unwrap().expect("should classify");
        assert_eq!(event.kind, EventKind::Added);
        assert_eq!(event.contract_address, log.address);
        assert_eq!(event.addresses, vec![sanctioned]);
        assert_eq!(event.log_index, Some(3));
    }

    #[test]
    fn unrelated_topic_is_skipped() {
        let transfer = keccak256("Transfer(address,address,uint256)".as_bytes());
        let log = log_with(transfer, encoded(&[]));
        assert!(classify_log(&log).unwrap().is_none());
    }

    #[test]
    fn log_without_topics_is_skipped() {
        let mut log = log_with(*topics::ADDED_TOPIC, encoded(&[]));
        log.topics.clear();
        assert!(classify_log(&log).unwrap().is_none());
    }

    #[test]
    fn malformed_payload_on_recognized_topic_is_an_error() {
        let log = log_with(*topics::REMOVED_TOPIC, vec![0u8; 16]);
        assert!(classify_log(&log).is_err());
    }
}

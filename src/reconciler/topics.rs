use alloy_primitives::{keccak256, B256};
use once_cell::sync::Lazy;

use crate::models::report::EventKind;

// Canonical signatures of the sanction-oracle events.
pub const ADDED_SIGNATURE: &str = "SanctionedAddressesAdded(address[])";
pub const REMOVED_SIGNATURE: &str = "SanctionedAddressesRemoved(address[])";

// Topic fingerprints, computed once per process.
pub static ADDED_TOPIC: Lazy<B256> = Lazy::new(|| keccak256(ADDED_SIGNATURE.as_bytes()));
pub static REMOVED_TOPIC: Lazy<B256> = Lazy::new(|| keccak256(REMOVED_SIGNATURE.as_bytes()));

/// Map a log's first topic to an event kind. Total: unknown fingerprints are
/// simply not sanction events.
pub fn classify_topic(topic: &B256) -> Option<EventKind> {
    if *topic == *ADDED_TOPIC {
        Some(EventKind::Added)
    } else if *topic == *REMOVED_TOPIC {
        Some(EventKind::Removed)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_topics_resolve() {
        assert_eq!(classify_topic(&ADDED_TOPIC), Some(EventKind::Added));
        assert_eq!(classify_topic(&REMOVED_TOPIC), Some(EventKind::Removed));
    }

    #[test]
    fn unknown_topic_is_not_an_error() {
        let transfer = keccak256("Transfer(address,address,uint256)".as_bytes());
        assert_eq!(classify_topic(&transfer), None);
    }

    #[test]
    fn fingerprints_are_distinct() {
        assert_ne!(*ADDED_TOPIC, *REMOVED_TOPIC);
    }
}

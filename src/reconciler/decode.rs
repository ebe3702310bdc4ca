use alloy_primitives::Address;

use crate::models::errors::DecodeError;

/// Hard ceiling on decoded array length. The length word is untrusted input;
/// real sanction batches are a few hundred entries at most.
pub const MAX_ADDRESSES: usize = 4096;

const WORD: usize = 32;

// Big-endian 32-byte word to usize; None if the value needs more than 64
// bits.
fn word_to_usize(word: &[u8]) -> Option<usize> {
    if word[..WORD - 8].iter().any(|byte| *byte != 0) {
        return None;
    }
    let raw = u64::from_be_bytes(word[WORD - 8..].try_into().ok()?);
    usize::try_from(raw).ok()
}

/// Decode the single ABI-encoded `address[]` carried in a sanction event's
/// log data.
///
/// Layout on the wire: a 32-byte head word holding the byte offset of the
/// array body (0x20 for these events), then at that offset a 32-byte length
/// `N`, then `N` 32-byte slots each holding a right-aligned 20-byte address.
/// The 12 padding bytes per slot are ignored, not validated, matching what
/// the source contracts emit.
pub fn decode_address_array(data: &[u8]) -> Result<Vec<Address>, DecodeError> {
    if data.len() < WORD {
        return Err(DecodeError::Truncated {
            expected: WORD,
            actual: data.len(),
        });
    }

    let offset = word_to_usize(&data[..WORD]).ok_or(DecodeError::WordOutOfRange { word: "offset" })?;
    let body_start = offset
        .checked_add(WORD)
        .ok_or(DecodeError::WordOutOfRange { word: "offset" })?;
    if data.len() < body_start {
        return Err(DecodeError::Truncated {
            expected: body_start,
            actual: data.len(),
        });
    }

    let count =
        word_to_usize(&data[offset..body_start]).ok_or(DecodeError::WordOutOfRange { word: "length" })?;
    if count > MAX_ADDRESSES {
        return Err(DecodeError::LengthExceedsCeiling {
            len: count,
            max: MAX_ADDRESSES,
        });
    }

    let expected = body_start + count * WORD;
    if data.len() < expected {
        return Err(DecodeError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let mut addresses = Vec::with_capacity(count);
    for i in 0..count {
        let slot = body_start + i * WORD;
        // Low-order 20 bytes of the slot.
        addresses.push(Address::from_slice(&data[slot + 12..slot + WORD]));
    }
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    // ABI-encode an address[] the way the sanction oracle emits it in log
    // data: offset word, length word, one right-padded slot per address.
    fn encode(addresses: &[Address]) -> Vec<u8> {
        let mut out = Vec::with_capacity(WORD * (2 + addresses.len()));
        let mut head = [0u8; WORD];
        head[WORD - 1] = WORD as u8;
        out.extend_from_slice(&head);
        let mut len_word = [0u8; WORD];
        len_word[WORD - 8..].copy_from_slice(&(addresses.len() as u64).to_be_bytes());
        out.extend_from_slice(&len_word);
        for addr in addresses {
            let mut slot = [0u8; WORD];
            slot[12..].copy_from_slice(addr.as_slice());
            out.extend_from_slice(&slot);
        }
        out
    }

    #[test]
    fn round_trips_empty_single_and_many() {
        let many: Vec<Address> = (0u8..7)
            .map(|i| Address::from_slice(&[i; 20]))
            .collect();
        for addresses in [vec![], vec![many[0]], many.clone()] {
            let decoded = decode_address_array(&encode(&addresses)).unwrap();
            assert_eq!(decoded, addresses);
        }
    }

    #[test]
    fn padding_bytes_are_ignored() {
        let addr = address!("0x1da5821544e25c636c1417ba96ade4cf6d2f9b5a");
        let mut data = encode(&[addr]);
        // Dirty the 12 padding bytes of the only slot.
        for byte in &mut data[64..76] {
            *byte = 0xff;
        }
        assert_eq!(decode_address_array(&data).unwrap(), vec![addr]);
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let addr = address!("0x1da5821544e25c636c1417ba96ade4cf6d2f9b5a");
        let data = encode(&[addr, addr]);
        let err = decode_address_array(&data[..data.len() - 1]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));

        let err = decode_address_array(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { .. }));
    }

    #[test]
    fn oversized_length_is_rejected_before_allocation() {
        let mut data = encode(&[]);
        // Claim u64::MAX entries.
        data[32..64].copy_from_slice(&{
            let mut word = [0u8; WORD];
            word[WORD - 8..].copy_from_slice(&u64::MAX.to_be_bytes());
            word
        });
        let err = decode_address_array(&data).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LengthExceedsCeiling { .. } | DecodeError::WordOutOfRange { .. }
        ));
    }

    #[test]
    fn non_numeric_length_word_is_rejected() {
        let mut data = encode(&[]);
        data[33] = 0x01; // set a high-order byte of the length word
        let err = decode_address_array(&data).unwrap_err();
        assert_eq!(err, DecodeError::WordOutOfRange { word: "length" });
    }
}

//! Property-based tests for identity components.
//!
//! These verify the parsing surfaces never panic on arbitrary input, the
//! address codecs round-trip, and that serialized identities cannot be
//! perturbed without detection.

use proptest::prelude::*;

use crate::identity::fixtures;
use crate::{Address, Identity};

proptest! {
    /// Any 40-bit value round-trips through the wire form.
    #[test]
    fn address_bytes_roundtrip(value in 0u64..(1u64 << 40)) {
        let addr = Address::new(value);
        prop_assert_eq!(Address::from(addr.to_bytes()), addr);
        prop_assert_eq!(Address::from_bytes(&addr.to_bytes()).unwrap(), addr);
    }

    /// Any 40-bit value round-trips through the text form.
    #[test]
    fn address_text_roundtrip(value in 0u64..(1u64 << 40)) {
        let addr = Address::new(value);
        let text = addr.to_string();
        prop_assert_eq!(text.len(), 10);
        prop_assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    /// Masking keeps new() closed over arbitrary input.
    #[test]
    fn address_new_masks(value: u64) {
        prop_assert!(Address::new(value).to_u64() < 1u64 << 40);
    }

    /// The text parser returns an error, never panics, on arbitrary
    /// strings (colon-rich ones included).
    #[test]
    fn from_str_never_panics(s in "[0-9a-zA-Z:!$%]{0,600}") {
        let _ = s.parse::<Identity>();
    }

    /// The wire parser returns an error, never panics, on arbitrary
    /// buffers.
    #[test]
    fn from_bytes_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        let _ = Identity::from_bytes(&bytes);
    }

    /// A parsed wire buffer re-encodes to exactly the consumed bytes.
    #[test]
    fn from_bytes_reencodes_consumed(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        if let Ok((id, consumed)) = Identity::from_bytes(&bytes) {
            let with_private = id.has_private();
            prop_assert_eq!(id.to_bytes(with_private), &bytes[..consumed]);
        }
    }

    /// No single-bit flip of a serialized public identity yields a
    /// different identity that still validates.
    #[test]
    fn marshal_bit_flip_rejected(index in 0usize..121, bit in 0u32..8) {
        let bytes = fixtures::p384().to_bytes(false);
        prop_assert_eq!(bytes.len(), 121);
        let mut mutated = bytes;
        mutated[index] ^= 1u8 << bit;
        if let Ok((parsed, _)) = Identity::from_bytes(&mutated) {
            prop_assert!(!parsed.locally_validate());
        }
    }

    /// Signatures from both identity types verify for arbitrary messages
    /// and fail for a perturbed message.
    #[test]
    fn sign_verify_arbitrary_messages(message in prop::collection::vec(any::<u8>(), 0..256)) {
        for id in [fixtures::c25519(), fixtures::p384()] {
            let sig = id.sign(&message).unwrap();
            prop_assert!(id.verify(&message, &sig));
            let mut tampered = message.clone();
            tampered.push(0x55);
            prop_assert!(!id.verify(&tampered, &sig));
        }
    }
}

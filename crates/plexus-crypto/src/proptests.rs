//! Property-based tests for the primitive wrappers.

use proptest::prelude::*;

use crate::{c25519, ecc384, hash};

proptest! {
    /// Multi-part hashing is equivalent to hashing the concatenation.
    #[test]
    fn sha384_split_invariant(data: Vec<u8>, split in 0usize..64) {
        let split = split.min(data.len());
        let (a, b) = data.split_at(split);
        prop_assert_eq!(hash::sha384(&[&data]), hash::sha384(&[a, b]));
    }

    /// Multi-part hashing is equivalent to hashing the concatenation.
    #[test]
    fn sha512_split_invariant(data: Vec<u8>, split in 0usize..64) {
        let split = split.min(data.len());
        let (a, b) = data.split_at(split);
        prop_assert_eq!(hash::sha512(&[&data]), hash::sha512(&[a, b]));
    }

    /// Signatures over arbitrary messages verify, and verification is bound
    /// to the exact message bytes.
    #[test]
    fn c25519_sign_verify(message: Vec<u8>) {
        let (public, private) = c25519::generate_combined();
        let sig = c25519::sign(&private, &message);
        prop_assert!(c25519::verify(&public, &message, &sig));

        let mut tampered = message.clone();
        tampered.push(0);
        prop_assert!(!c25519::verify(&public, &tampered, &sig));
    }

    /// Truncated or padded signatures never verify.
    #[test]
    fn c25519_verify_requires_exact_length(len in 0usize..200) {
        prop_assume!(len != c25519::SIGNATURE_SIZE);
        let (public, private) = c25519::generate_combined();
        let sig = c25519::sign(&private, b"msg");
        let mut resized = sig.to_vec();
        resized.resize(len, 0);
        prop_assert!(!c25519::verify(&public, b"msg", &resized));
    }

    /// ECDSA verification is bound to the exact digest.
    #[test]
    fn ecc384_digest_binding(a: [u8; 48], b: [u8; 48]) {
        prop_assume!(a != b);
        let (public, private) = ecc384::generate();
        let sig = ecc384::sign(&private, &a).unwrap();
        prop_assert!(ecc384::verify(&public, &a, &sig));
        prop_assert!(!ecc384::verify(&public, &b, &sig));
    }
}

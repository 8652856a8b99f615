//! Identity fingerprints.
//!
//! A fingerprint is the stable reference other peers hold for an identity:
//! the 40-bit address paired with the SHA-384 hash of the public key. The
//! pair is what peer tables key on, so it is ordered and hashable.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::Address;

/// Size of the fingerprint hash in bytes (SHA-384).
pub const FINGERPRINT_HASH_SIZE: usize = 48;

/// An identity's address plus the SHA-384 hash of its public key.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Fingerprint {
    /// The identity's routable address.
    pub address: Address,
    /// SHA-384 of the identity's public key (type-specific length).
    #[serde(with = "hash_serde")]
    pub hash: [u8; FINGERPRINT_HASH_SIZE],
}

impl Fingerprint {
    /// The all-zero fingerprint, carried by identities that have not been
    /// generated or parsed yet.
    pub const ZERO: Fingerprint = Fingerprint {
        address: Address::ZERO,
        hash: [0u8; FINGERPRINT_HASH_SIZE],
    };

    /// Whether both the address and the hash are zero.
    ///
    /// Comparison is constant-time.
    pub fn is_zero(&self) -> bool {
        self.address == Address::ZERO && bool::from(self.hash.ct_eq(&[0u8; FINGERPRINT_HASH_SIZE]))
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Fingerprint::ZERO
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        // Constant-time over the hash half.
        self.address == other.address && bool::from(self.hash.ct_eq(&other.hash))
    }
}

impl Eq for Fingerprint {}

impl Ord for Fingerprint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address
            .cmp(&other.address)
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl PartialOrd for Fingerprint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::hash::Hash for Fingerprint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.address.hash(state);
        self.hash.hash(state);
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, hex::encode(self.hash))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fingerprint({}, {}..)",
            self.address,
            &hex::encode(self.hash)[..16]
        )
    }
}

/// Serde helpers for the 48-byte hash field.
///
/// Fixed-size arrays above 32 bytes have no derived serde impls, so the
/// hash travels as a length-checked byte sequence.
mod hash_serde {
    use super::FINGERPRINT_HASH_SIZE;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(
        hash: &[u8; FINGERPRINT_HASH_SIZE],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        hash[..].serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> std::result::Result<[u8; FINGERPRINT_HASH_SIZE], D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Vec::deserialize(deserializer)?;
        if bytes.len() != FINGERPRINT_HASH_SIZE {
            return Err(serde::de::Error::invalid_length(
                bytes.len(),
                &"48 hash bytes",
            ));
        }
        let mut hash = [0u8; FINGERPRINT_HASH_SIZE];
        hash.copy_from_slice(&bytes);
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(addr: u64, fill: u8) -> Fingerprint {
        Fingerprint {
            address: Address::new(addr),
            hash: [fill; FINGERPRINT_HASH_SIZE],
        }
    }

    #[test]
    fn test_zero() {
        assert!(Fingerprint::ZERO.is_zero());
        assert!(Fingerprint::default().is_zero());
        assert!(!sample(1, 0).is_zero());
        assert!(!sample(0, 1).is_zero());
    }

    #[test]
    fn test_equality_componentwise() {
        assert_eq!(sample(7, 3), sample(7, 3));
        assert_ne!(sample(7, 3), sample(8, 3));
        assert_ne!(sample(7, 3), sample(7, 4));
    }

    #[test]
    fn test_ordering_address_first() {
        assert!(sample(1, 0xff) < sample(2, 0x00));
        assert!(sample(2, 0x01) < sample(2, 0x02));
    }

    #[test]
    fn test_usable_as_map_key() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(sample(1, 1));
        set.insert(sample(1, 1));
        set.insert(sample(2, 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        let fp = sample(0x0123456789, 0xab);
        let text = fp.to_string();
        assert!(text.starts_with("0123456789:abab"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let fp = sample(0xbeef, 0x5a);
        let bytes = bincode::serialize(&fp).unwrap();
        let restored: Fingerprint = bincode::deserialize(&bytes).unwrap();
        assert_eq!(fp, restored);
    }

    #[test]
    fn test_serde_rejects_wrong_hash_length() {
        #[derive(serde::Serialize)]
        struct Loose {
            address: Address,
            hash: Vec<u8>,
        }
        let loose = Loose {
            address: Address::new(1),
            hash: vec![0u8; FINGERPRINT_HASH_SIZE - 1],
        };
        let bytes = bincode::serialize(&loose).unwrap();
        assert!(bincode::deserialize::<Fingerprint>(&bytes).is_err());
    }
}

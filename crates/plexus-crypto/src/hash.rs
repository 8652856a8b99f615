//! Multi-part SHA-384 and SHA-512 helpers.
//!
//! Fingerprints, proof-of-work seeds, signature digests and key-agreement
//! derivation all hash short sequences of byte slices. These helpers take
//! the parts as a slice so call sites never concatenate into temporaries.

use sha2::{Digest, Sha384, Sha512};

/// SHA-384 digest size in bytes.
pub const SHA384_DIGEST_SIZE: usize = 48;

/// SHA-512 digest size in bytes.
pub const SHA512_DIGEST_SIZE: usize = 64;

/// SHA-384 over the concatenation of `parts`.
pub fn sha384(parts: &[&[u8]]) -> [u8; SHA384_DIGEST_SIZE] {
    let mut hasher = Sha384::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; SHA384_DIGEST_SIZE];
    out.copy_from_slice(digest.as_slice());
    out
}

/// SHA-512 over the concatenation of `parts`.
pub fn sha512(parts: &[&[u8]]) -> [u8; SHA512_DIGEST_SIZE] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; SHA512_DIGEST_SIZE];
    out.copy_from_slice(digest.as_slice());
    out
}

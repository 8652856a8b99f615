//! Memory-hard proof-of-work functions gating identity creation.
//!
//! Every identity's public key must pass a proof-of-work before the
//! network will accept it. Both constructions below are deliberately
//! memory-hard and serial: the type-0 hash chains a Salsa20 keystream
//! through a 2 MiB buffer so the computation cannot be seeked or
//! parallelized, and the type-1 hash fills 128 KiB through a branch-heavy
//! mixer, sorts the whole buffer, and MACs it, so no part of the working
//! set can be skipped.
//!
//! All of the constants in this module are consensus parameters shared
//! with every other node on the network. Changing any of them breaks
//! interoperability.

use poly1305::universal_hash::KeyInit;
use poly1305::{Key, Poly1305};
use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::{Salsa12, Salsa20};

use plexus_crypto::hash;

/// Scratch memory required by the type-0 proof-of-work, in bytes.
pub const V0_IDENTITY_GEN_MEMORY: usize = 2_097_152;

/// Type-0 acceptance threshold: the first digest byte must be below this.
pub const V0_POW_THRESHOLD: u8 = 17;

/// Offset of the derived address within a type-0 proof-of-work digest.
pub const V0_ADDRESS_DIGEST_OFFSET: usize = 59;

/// Working-buffer size of the type-1 proof-of-work, in bytes.
pub const V1_POW_MEMORY: usize = 131_072;

/// Type-1 acceptance modulus: the leading big-endian word of the final
/// buffer must be divisible by this.
pub const V1_POW_MODULUS: u64 = 1000;

const V0_GEN_WORDS: usize = V0_IDENTITY_GEN_MEMORY / 8;
const V1_WORDS: usize = V1_POW_MEMORY / 8;

// Large primes close to 2^52; reducing by them resists shortcutting the
// modulo lane with cheap bit masks.
const V1_MODULI: [u64; 8] = [
    4503599627370101,
    4503599627370161,
    4503599627370227,
    4503599627370287,
    4503599627370299,
    4503599627370323,
    4503599627370353,
    4503599627370449,
];

fn be_word(buf: &[u8], word: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[word * 8..word * 8 + 8]);
    u64::from_be_bytes(bytes)
}

fn le_word(buf: &[u8], word: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[word * 8..word * 8 + 8]);
    u64::from_le_bytes(bytes)
}

/// The type-0 identity proof-of-work hash.
///
/// Deterministically maps a public key to a 64-byte digest using `genmem`
/// as scratch space. `genmem` must be exactly
/// [`V0_IDENTITY_GEN_MEMORY`] bytes; its prior contents are ignored.
///
/// The digest passes the proof-of-work when its first byte is below
/// [`V0_POW_THRESHOLD`], and bytes 59..64 of a passing digest are the
/// identity's address.
pub fn v0_frankenhash(public_key: &[u8], digest: &mut [u8; 64], genmem: &mut [u8]) {
    assert_eq!(genmem.len(), V0_IDENTITY_GEN_MEMORY);

    *digest = hash::sha512(&[public_key]);

    // Fill the scratch buffer with a block-chained Salsa20 keystream.
    // Plain Salsa20 counter mode is randomly seekable; copying the
    // previous block into the next before encrypting makes every block
    // depend on the one before it.
    genmem.fill(0);
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest[..32]);
    let mut nonce = [0u8; 8];
    nonce.copy_from_slice(&digest[32..40]);
    let mut cipher = Salsa20::new(&key.into(), &nonce.into());

    cipher.apply_keystream(&mut genmem[..64]);
    for i in (64..V0_IDENTITY_GEN_MEMORY).step_by(64) {
        genmem.copy_within(i - 64..i, i);
        cipher.apply_keystream(&mut genmem[i..i + 64]);
    }

    // Render the final digest with the buffer as a lookup table: swap one
    // digest word with a buffer word chosen by the buffer contents, then
    // re-encrypt the digest, for every pair of buffer words. The swap
    // indices are read big-endian; the swap itself moves raw bytes.
    let mut word = 0usize;
    while word < V0_GEN_WORDS {
        let idx1 = (be_word(genmem, word) % 8) as usize * 8;
        let idx2 = (be_word(genmem, word + 1) % V0_GEN_WORDS as u64) as usize * 8;
        word += 2;

        let mut tmp = [0u8; 8];
        tmp.copy_from_slice(&genmem[idx2..idx2 + 8]);
        genmem[idx2..idx2 + 8].copy_from_slice(&digest[idx1..idx1 + 8]);
        digest[idx1..idx1 + 8].copy_from_slice(&tmp);

        cipher.apply_keystream(digest);
    }
}

/// The type-1 identity proof-of-work criterion.
///
/// Deterministically accepts or rejects `input` (the compound public key).
/// Internally fills a [`V1_POW_MEMORY`]-byte buffer through a
/// branch-dependent mixer, sorts it as little-endian words, MACs it with
/// Poly1305, and accepts when the leading big-endian word of the result
/// is divisible by [`V1_POW_MODULUS`].
pub fn v1_pow_criterion(input: &[u8]) -> bool {
    v1_pow_result(input) % V1_POW_MODULUS == 0
}

fn v1_pow_result(input: &[u8]) -> u64 {
    let mut w = vec![0u8; V1_POW_MEMORY];
    let seed = hash::sha512(&[input]);
    w[..64].copy_from_slice(&seed);

    // Each 64-byte block is derived from the previous one through one of
    // three mixers chosen by the previous block's contents. The selector
    // words are read little-endian, matching the word order the final
    // sort uses.
    let mut i = 64usize;
    while i < V1_POW_MEMORY {
        let j = i - 64;
        if le_word(&w, j / 8) & 7 == 0 {
            let next = hash::sha512(&[&w[j..i]]);
            w[i..i + 64].copy_from_slice(&next);
        } else if le_word(&w, j / 8 + 1) & 15 == 0 {
            // Reduce each lane by its prime (big-endian), then overwrite
            // the first 48 bytes of the block with SHA-384 of the whole
            // 128-byte window. The last 16 bytes keep the residues of
            // lanes 6 and 7; that byte pattern is part of the consensus
            // function.
            for (lane, modulus) in V1_MODULI.iter().enumerate() {
                let residue = be_word(&w, j / 8 + lane) % modulus;
                w[i + lane * 8..i + lane * 8 + 8].copy_from_slice(&residue.to_be_bytes());
            }
            let next = hash::sha384(&[&w[j..j + 128]]);
            w[i..i + 48].copy_from_slice(&next);
        } else {
            let mut key = [0u8; 32];
            key.copy_from_slice(&w[j..j + 32]);
            let mut nonce = [0u8; 8];
            nonce.copy_from_slice(&w[j + 32..j + 40]);
            let mut block = [0u8; 64];
            block.copy_from_slice(&w[j..i]);
            Salsa12::new(&key.into(), &nonce.into()).apply_keystream(&mut block);
            w[i..i + 64].copy_from_slice(&block);
        }
        i += 64;
    }

    // Sorting makes every word's final position depend on every other
    // word's value, so the whole buffer has to exist to finish.
    let mut words = vec![0u64; V1_WORDS];
    for (k, word) in words.iter_mut().enumerate() {
        *word = le_word(&w, k);
    }
    words.sort_unstable();
    for (k, word) in words.iter().enumerate() {
        w[k * 8..k * 8 + 8].copy_from_slice(&word.to_le_bytes());
    }

    // MAC the sorted buffer with itself: the first 32 bytes key Poly1305
    // and the 16-byte tag lands back over the first 16 bytes.
    let mut mac_key = [0u8; 32];
    mac_key.copy_from_slice(&w[..32]);
    let tag = Poly1305::new(Key::from_slice(&mac_key)).compute_unpadded(&w);
    w[..16].copy_from_slice(tag.as_slice());

    be_word(&w, 0)
}

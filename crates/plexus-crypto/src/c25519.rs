//! Combined Curve25519/Ed25519 key pairs.
//!
//! The overlay carries an X25519 key-exchange key and an Ed25519 signing
//! key together as one credential: a 64-byte public buffer (X25519 public
//! followed by Ed25519 public) and a 64-byte private buffer (X25519 scalar
//! followed by Ed25519 seed). All operations here work on those fixed
//! buffers so higher layers can embed them at fixed offsets in larger key
//! layouts.
//!
//! ## Security Notes
//!
//! - Key generation uses `OsRng`
//! - Ed25519 verification is strict (cofactored edge cases are rejected)
//! - Intermediate secret buffers are zeroized

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::hash;

/// Size of a combined X25519 + Ed25519 public key in bytes.
pub const COMBINED_PUBLIC_KEY_SIZE: usize = 64;

/// Size of a combined X25519 + Ed25519 private key in bytes.
pub const COMBINED_PRIVATE_KEY_SIZE: usize = 64;

/// Size of the X25519 half of a combined key in bytes.
pub const ECDH_PUBLIC_KEY_SIZE: usize = 32;

/// Size of an X25519 shared secret in bytes.
pub const ECDH_SHARED_SECRET_SIZE: usize = 32;

/// Size of a signature in bytes: Ed25519 signature (64) followed by the
/// first 32 bytes of the SHA-512 digest of the signed message.
pub const SIGNATURE_SIZE: usize = 96;

/// Generate a fresh combined key pair.
///
/// Returns `(public, private)` where both halves are freshly generated
/// from `OsRng`.
pub fn generate_combined() -> (
    [u8; COMBINED_PUBLIC_KEY_SIZE],
    [u8; COMBINED_PRIVATE_KEY_SIZE],
) {
    let ecdh_secret = StaticSecret::random_from_rng(OsRng);
    let ecdh_public = PublicKey::from(&ecdh_secret);
    let signing = SigningKey::generate(&mut OsRng);

    let mut public = [0u8; COMBINED_PUBLIC_KEY_SIZE];
    public[..32].copy_from_slice(ecdh_public.as_bytes());
    public[32..].copy_from_slice(signing.verifying_key().as_bytes());

    let mut private = [0u8; COMBINED_PRIVATE_KEY_SIZE];
    let mut scalar = ecdh_secret.to_bytes();
    private[..32].copy_from_slice(&scalar);
    scalar.zeroize();
    let mut seed = signing.to_bytes();
    private[32..].copy_from_slice(&seed);
    seed.zeroize();

    (public, private)
}

/// Generate combined key pairs until `criterion` accepts the public half.
///
/// The criterion sees the full 64-byte public buffer. Rejected private
/// halves are zeroized before the next attempt.
pub fn generate_satisfying<F>(
    mut criterion: F,
) -> (
    [u8; COMBINED_PUBLIC_KEY_SIZE],
    [u8; COMBINED_PRIVATE_KEY_SIZE],
)
where
    F: FnMut(&[u8; COMBINED_PUBLIC_KEY_SIZE]) -> bool,
{
    loop {
        let (public, mut private) = generate_combined();
        if criterion(&public) {
            return (public, private);
        }
        private.zeroize();
    }
}

/// X25519 key agreement between our combined private key and a peer's
/// 32-byte X25519 public key.
pub fn agree(
    private: &[u8; COMBINED_PRIVATE_KEY_SIZE],
    peer_ecdh_public: &[u8; ECDH_PUBLIC_KEY_SIZE],
) -> [u8; ECDH_SHARED_SECRET_SIZE] {
    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(&private[..32]);
    let secret = StaticSecret::from(scalar);
    scalar.zeroize();
    let shared = secret.diffie_hellman(&PublicKey::from(*peer_ecdh_public));
    shared.to_bytes()
}

/// Sign `data` with the Ed25519 half of a combined private key.
///
/// The 96-byte result is the Ed25519 signature over `data` followed by the
/// first 32 bytes of SHA-512(data). [`verify`] checks both halves.
pub fn sign(private: &[u8; COMBINED_PRIVATE_KEY_SIZE], data: &[u8]) -> [u8; SIGNATURE_SIZE] {
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&private[32..]);
    let signing = SigningKey::from_bytes(&seed);
    seed.zeroize();

    let sig = signing.sign(data);
    let digest = hash::sha512(&[data]);

    let mut out = [0u8; SIGNATURE_SIZE];
    out[..64].copy_from_slice(&sig.to_bytes());
    out[64..].copy_from_slice(&digest[..32]);
    out
}

/// Verify a 96-byte signature against a combined public key.
///
/// The embedded message digest must match and the Ed25519 signature must
/// verify strictly. Any other signature length fails.
pub fn verify(public: &[u8; COMBINED_PUBLIC_KEY_SIZE], data: &[u8], signature: &[u8]) -> bool {
    if signature.len() != SIGNATURE_SIZE {
        return false;
    }

    let digest = hash::sha512(&[data]);
    if !bool::from(digest[..32].ct_eq(&signature[64..])) {
        return false;
    }

    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&public[32..]);
    let verifying = match VerifyingKey::from_bytes(&key_bytes) {
        Ok(key) => key,
        Err(_) => return false,
    };

    let mut sig_bytes = [0u8; 64];
    sig_bytes.copy_from_slice(&signature[..64]);
    verifying
        .verify_strict(data, &Signature::from_bytes(&sig_bytes))
        .is_ok()
}

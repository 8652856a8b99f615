//! NIST P-384 (secp384r1) ECDSA and ECDH.
//!
//! Public keys travel SEC1-compressed (49 bytes), private keys are raw
//! 48-byte scalars, and signatures are fixed-width 96-byte `r ‖ s`. ECDSA
//! runs over a caller-supplied 48-byte digest so the caller controls what
//! is bound into the signature.

use p384::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p384::ecdsa::{Signature, SigningKey, VerifyingKey};
use p384::elliptic_curve::sec1::ToEncodedPoint;
use p384::{PublicKey, SecretKey};
use rand::rngs::OsRng;

use crate::{CryptoError, Result};

/// Size of a SEC1-compressed P-384 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 49;

/// Size of a raw P-384 private scalar in bytes.
pub const PRIVATE_KEY_SIZE: usize = 48;

/// Size of a fixed-width P-384 ECDSA signature in bytes.
pub const SIGNATURE_SIZE: usize = 96;

/// Size of a P-384 ECDH shared secret in bytes.
pub const ECDH_SHARED_SECRET_SIZE: usize = 48;

/// Size of the digest signed and verified by this module.
pub const DIGEST_SIZE: usize = 48;

/// Generate a fresh P-384 key pair from `OsRng`.
///
/// Returns `(public, private)` with the public key SEC1-compressed.
pub fn generate() -> ([u8; PUBLIC_KEY_SIZE], [u8; PRIVATE_KEY_SIZE]) {
    let secret = SecretKey::random(&mut OsRng);
    let point = secret.public_key().to_encoded_point(true);

    let mut public = [0u8; PUBLIC_KEY_SIZE];
    public.copy_from_slice(point.as_bytes());
    let mut private = [0u8; PRIVATE_KEY_SIZE];
    private.copy_from_slice(secret.to_bytes().as_slice());

    (public, private)
}

/// ECDSA-sign a 48-byte digest, producing a fixed-width 96-byte signature.
///
/// # Errors
///
/// Returns an error if `private` has the wrong length, is not a valid
/// scalar, or the underlying signer fails.
pub fn sign(private: &[u8], digest: &[u8; DIGEST_SIZE]) -> Result<[u8; SIGNATURE_SIZE]> {
    if private.len() != PRIVATE_KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength {
            expected: PRIVATE_KEY_SIZE,
            actual: private.len(),
        });
    }
    let key = SigningKey::from_slice(private).map_err(|_| CryptoError::InvalidScalar)?;
    let signature: Signature = key
        .sign_prehash(digest)
        .map_err(|_| CryptoError::SignatureFailed)?;

    let mut out = [0u8; SIGNATURE_SIZE];
    out.copy_from_slice(signature.to_bytes().as_slice());
    Ok(out)
}

/// Verify a 96-byte signature over a 48-byte digest.
///
/// Returns `false` for any malformed public key, malformed signature, or
/// verification failure.
pub fn verify(public: &[u8], digest: &[u8; DIGEST_SIZE], signature: &[u8]) -> bool {
    if public.len() != PUBLIC_KEY_SIZE || signature.len() != SIGNATURE_SIZE {
        return false;
    }
    let key = match VerifyingKey::from_sec1_bytes(public) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature = match Signature::from_slice(signature) {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    key.verify_prehash(digest, &signature).is_ok()
}

/// ECDH between a peer's compressed public key and our private scalar.
///
/// # Errors
///
/// Returns an error if either key fails to decode.
pub fn agree(peer_public: &[u8], private: &[u8]) -> Result<[u8; ECDH_SHARED_SECRET_SIZE]> {
    if peer_public.len() != PUBLIC_KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength {
            expected: PUBLIC_KEY_SIZE,
            actual: peer_public.len(),
        });
    }
    if private.len() != PRIVATE_KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength {
            expected: PRIVATE_KEY_SIZE,
            actual: private.len(),
        });
    }
    let secret = SecretKey::from_slice(private).map_err(|_| CryptoError::InvalidScalar)?;
    let public = PublicKey::from_sec1_bytes(peer_public).map_err(|_| CryptoError::InvalidPoint)?;
    let shared = p384::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());

    let mut out = [0u8; ECDH_SHARED_SECRET_SIZE];
    out.copy_from_slice(shared.raw_secret_bytes().as_slice());
    Ok(out)
}

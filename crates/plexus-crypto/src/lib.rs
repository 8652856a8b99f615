//! # plexus-crypto
//!
//! Cryptographic primitives for the plexus overlay network.
//!
//! This crate wraps the vetted curve and hash implementations the identity
//! layer is built on:
//!
//! - **Combined Curve25519/Ed25519 keys**: X25519 key exchange and Ed25519
//!   signing keys carried together in fixed 64-byte buffers
//! - **NIST P-384**: ECDSA over caller-supplied digests and ECDH, with
//!   SEC1-compressed public keys
//! - **Hashing**: multi-part SHA-384 and SHA-512 helpers
//!
//! ## Security
//!
//! Private key material held in intermediate buffers is zeroized before the
//! buffers are released. Signature and key-exchange operations delegate to
//! constant-time implementations; nothing in this crate branches on secret
//! data.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod c25519;
pub mod ecc384;
pub mod error;
pub mod hash;

#[cfg(test)]
mod proptests;

pub use error::{CryptoError, Result};

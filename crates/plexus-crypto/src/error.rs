//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A key buffer had the wrong length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Actual key length in bytes.
        actual: usize,
    },

    /// A public key was not a valid curve point encoding.
    #[error("invalid elliptic curve point encoding")]
    InvalidPoint,

    /// A private key was not a valid curve scalar.
    #[error("invalid elliptic curve scalar")]
    InvalidScalar,

    /// Signing failed in the underlying implementation.
    #[error("signing failed")]
    SignatureFailed,
}

/// Result type for cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

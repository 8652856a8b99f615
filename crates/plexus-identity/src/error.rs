//! Error types for identity operations.

use thiserror::Error;

use plexus_crypto::CryptoError;

/// Errors that can occur during identity operations.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Input did not parse: bad field layout, bad encoding, short buffer,
    /// unknown type tag, or an unexpected private-key length.
    #[error("malformed identity input: {0}")]
    MalformedInput(&'static str),

    /// Input parsed but the identity's self-consistency checks failed
    /// (address/hash binding or proof-of-work).
    #[error("identity failed local validation")]
    InvalidIdentity,

    /// The operation needs a private key and this identity only carries
    /// the public half.
    #[error("operation requires a private key")]
    OperationUnavailable,

    /// The two identity types share no common key-agreement primitive.
    #[error("identity types cannot derive a shared key")]
    IncompatibleTypes,

    /// Error from an underlying cryptographic primitive.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Result type for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;

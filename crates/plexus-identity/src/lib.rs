//! # plexus-identity
//!
//! Node identities for the plexus peer-to-peer overlay network.
//!
//! An identity binds a short routable [`Address`] to a public-key
//! credential in a way that is expensive to generate and cheap to verify:
//! creating an identity requires grinding key pairs through a memory-hard
//! proof-of-work, while checking one is a single hash-and-compare pass.
//! That asymmetry makes identity spoofing and address-space enumeration
//! economically unattractive.
//!
//! Provides:
//!
//! - [`Identity`] generation, validation, signing, verification and
//!   authenticated key agreement for both identity types
//! - The two memory-hard proof-of-work functions gating identity creation
//!   ([`pow`])
//! - The frozen binary wire encoding and the human-readable text encoding
//!   of identities
//!
//! Identities are immutable once constructed and freely shareable across
//! threads. Private key material is zeroized on drop.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod error;
pub mod fingerprint;
pub mod identity;
pub mod pow;

#[cfg(test)]
mod proptests;

pub use address::{Address, ADDRESS_SIZE};
pub use error::{IdentityError, Result};
pub use fingerprint::{Fingerprint, FINGERPRINT_HASH_SIZE};
pub use identity::{
    Identity, IdentityType, IDENTITY_MARSHAL_SIZE_MAX, IDENTITY_SIGNATURE_SIZE,
    IDENTITY_STRING_SIZE_MAX, NIL, SYMMETRIC_KEY_SIZE,
};

//! 40-bit routable addresses.
//!
//! An address is the short handle peers route by. It is derived from an
//! identity's proof-of-work output (type 0) or fingerprint hash (type 1),
//! serialized big-endian in five bytes, and rendered as ten lowercase hex
//! digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{IdentityError, Result};

/// Size of a serialized address in bytes.
pub const ADDRESS_SIZE: usize = 5;

const ADDRESS_MASK: u64 = 0x00ff_ffff_ffff;

/// A 40-bit overlay network address.
///
/// Two ranges are *reserved* and never appear in a valid identity: the
/// zero address and every address whose most significant byte is `0xff`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(u64);

impl Address {
    /// The zero address.
    pub const ZERO: Address = Address(0);

    /// Build an address from the low 40 bits of `value`.
    pub const fn new(value: u64) -> Self {
        Address(value & ADDRESS_MASK)
    }

    /// Parse an address from the first five bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MalformedInput`] if fewer than five bytes
    /// are given.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ADDRESS_SIZE {
            return Err(IdentityError::MalformedInput("address needs five bytes"));
        }
        let mut wire = [0u8; ADDRESS_SIZE];
        wire.copy_from_slice(&bytes[..ADDRESS_SIZE]);
        Ok(Address::from(wire))
    }

    /// The big-endian five-byte wire form.
    pub fn to_bytes(self) -> [u8; ADDRESS_SIZE] {
        let be = self.0.to_be_bytes();
        [be[3], be[4], be[5], be[6], be[7]]
    }

    /// The address as an integer in `0..2^40`.
    pub const fn to_u64(self) -> u64 {
        self.0
    }

    /// Whether this address is in a reserved range: zero, or most
    /// significant byte `0xff`.
    pub const fn is_reserved(self) -> bool {
        self.0 == 0 || (self.0 >> 32) == 0xff
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(wire: [u8; ADDRESS_SIZE]) -> Self {
        Address(
            (wire[0] as u64) << 32
                | (wire[1] as u64) << 24
                | (wire[2] as u64) << 16
                | (wire[3] as u64) << 8
                | wire[4] as u64,
        )
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010x}", self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:010x})", self.0)
    }
}

impl FromStr for Address {
    type Err = IdentityError;

    /// Parse the fixed-width text form: exactly ten hex digits.
    fn from_str(s: &str) -> Result<Self> {
        if s.len() != ADDRESS_SIZE * 2 {
            return Err(IdentityError::MalformedInput("address must be 10 hex digits"));
        }
        u64::from_str_radix(s, 16)
            .map(Address::new)
            .map_err(|_| IdentityError::MalformedInput("address must be 10 hex digits"))
    }
}

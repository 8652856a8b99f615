//! Node identities: proof-of-work gated public-key credentials.
//!
//! An [`Identity`] is a tagged pair of key buffers plus the
//! [`Fingerprint`] derived from them. Type 0 carries a combined
//! Curve25519/Ed25519 credential whose address comes out of the
//! memory-hard type-0 proof-of-work; type 1 carries a compound credential
//! (nonce, Curve25519/Ed25519, NIST P-384) whose address is the leading
//! 40 bits of its fingerprint hash. The compound form lets a type-1
//! identity agree with both older and newer peers.
//!
//! Identities are immutable after construction. Binary and text encodings
//! are wire formats shared with the rest of the network and must not
//! change.

use std::fmt;
use std::str::FromStr;

use tracing::trace;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use plexus_crypto::{c25519, ecc384, hash};

use crate::pow;
use crate::{Address, Fingerprint, IdentityError, Result, ADDRESS_SIZE, FINGERPRINT_HASH_SIZE};

/// Size of a type-0 public key: X25519 ‖ Ed25519.
pub const TYPE0_PUBLIC_KEY_SIZE: usize = c25519::COMBINED_PUBLIC_KEY_SIZE;

/// Size of a type-0 private key: X25519 scalar ‖ Ed25519 seed.
pub const TYPE0_PRIVATE_KEY_SIZE: usize = c25519::COMBINED_PRIVATE_KEY_SIZE;

/// Size of a type-1 public key: nonce ‖ X25519 ‖ Ed25519 ‖ P-384.
pub const TYPE1_PUBLIC_KEY_SIZE: usize =
    1 + c25519::COMBINED_PUBLIC_KEY_SIZE + ecc384::PUBLIC_KEY_SIZE;

/// Size of a type-1 private key: X25519 scalar ‖ Ed25519 seed ‖ P-384
/// scalar. The nonce byte exists only in the public layout.
pub const TYPE1_PRIVATE_KEY_SIZE: usize =
    c25519::COMBINED_PRIVATE_KEY_SIZE + ecc384::PRIVATE_KEY_SIZE;

/// Size of an identity signature in bytes, both types.
pub const IDENTITY_SIGNATURE_SIZE: usize = 96;

/// Size of the symmetric key produced by [`Identity::agree`].
pub const SYMMETRIC_KEY_SIZE: usize = 48;

/// Largest possible binary encoding of an identity.
pub const IDENTITY_MARSHAL_SIZE_MAX: usize =
    ADDRESS_SIZE + 1 + TYPE1_PUBLIC_KEY_SIZE + 1 + TYPE1_PRIVATE_KEY_SIZE;

/// Buffer size that always holds a text-encoded identity.
pub const IDENTITY_STRING_SIZE_MAX: usize = 1024;

// Offsets of the curve halves inside the compound (type 1) layouts.
const T1_PUB_C25519: usize = 1;
const T1_PUB_P384: usize = 1 + c25519::COMBINED_PUBLIC_KEY_SIZE;
const T1_PRIV_P384: usize = c25519::COMBINED_PRIVATE_KEY_SIZE;

// Type-1 text fields use unpadded lowercase RFC 4648 base32
// ("abcdefghijklmnopqrstuvwxyz234567"), the same alphabet the overlay uses
// for its other address-like tokens.
const TEXT_BASE32: base32::Alphabet = base32::Alphabet::Rfc4648Lower { padding: false };

/// The identity type tag.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentityType {
    /// Combined Curve25519/Ed25519 credential (wire tag `0x00`).
    C25519 = 0,
    /// Compound credential adding NIST P-384 (wire tag `0x01`).
    P384 = 1,
}

impl IdentityType {
    /// The wire tag byte.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Public key length for this type.
    pub const fn public_key_size(self) -> usize {
        match self {
            IdentityType::C25519 => TYPE0_PUBLIC_KEY_SIZE,
            IdentityType::P384 => TYPE1_PUBLIC_KEY_SIZE,
        }
    }

    /// Private key length for this type.
    pub const fn private_key_size(self) -> usize {
        match self {
            IdentityType::C25519 => TYPE0_PRIVATE_KEY_SIZE,
            IdentityType::P384 => TYPE1_PRIVATE_KEY_SIZE,
        }
    }
}

impl TryFrom<u8> for IdentityType {
    type Error = IdentityError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(IdentityType::C25519),
            1 => Ok(IdentityType::P384),
            _ => Err(IdentityError::MalformedInput("unknown identity type")),
        }
    }
}

/// A node identity: type tag, public key, optional private key, and the
/// fingerprint binding them to a routable address.
///
/// Construct one with [`Identity::generate`], by parsing the text form
/// with [`str::parse`], or by decoding the wire form with
/// [`Identity::from_bytes`]. Identities are immutable once constructed
/// and freely shareable across threads; the private half, when present,
/// is zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Identity {
    #[zeroize(skip)]
    kind: IdentityType,
    #[zeroize(skip)]
    public: [u8; TYPE1_PUBLIC_KEY_SIZE],
    private: [u8; TYPE1_PRIVATE_KEY_SIZE],
    #[zeroize(skip)]
    has_private: bool,
    #[zeroize(skip)]
    fp: Fingerprint,
}

/// The nil identity: type 0, all-zero keys, zero fingerprint. Never valid;
/// used as the "no identity" placeholder.
pub static NIL: Identity = blank(IdentityType::C25519);

const fn blank(kind: IdentityType) -> Identity {
    Identity {
        kind,
        public: [0u8; TYPE1_PUBLIC_KEY_SIZE],
        private: [0u8; TYPE1_PRIVATE_KEY_SIZE],
        has_private: false,
        fp: Fingerprint::ZERO,
    }
}

impl Identity {
    /// Generate a fresh identity of the given type.
    ///
    /// Loops over candidate key pairs until one passes the type's
    /// proof-of-work and yields a non-reserved address, so this is
    /// CPU-bound and can take seconds. Callers wanting parallel search
    /// run independent generators on separate threads and keep the first
    /// winner. The result always carries a private key.
    pub fn generate(kind: IdentityType) -> Identity {
        match kind {
            IdentityType::C25519 => Identity::generate_c25519(),
            IdentityType::P384 => Identity::generate_p384(),
        }
    }

    fn generate_c25519() -> Identity {
        let mut digest = [0u8; 64];
        let mut genmem = vec![0u8; pow::V0_IDENTITY_GEN_MEMORY];
        let mut attempts = 0u64;
        loop {
            let (public, mut private) = c25519::generate_satisfying(|candidate| {
                attempts += 1;
                pow::v0_frankenhash(candidate, &mut digest, &mut genmem);
                digest[0] < pow::V0_POW_THRESHOLD
            });

            // The address comes out of the proof-of-work digest, not the
            // fingerprint hash.
            let mut wire = [0u8; ADDRESS_SIZE];
            wire.copy_from_slice(&digest[pow::V0_ADDRESS_DIGEST_OFFSET..][..ADDRESS_SIZE]);
            let address = Address::from(wire);
            if address.is_reserved() {
                private.zeroize();
                continue;
            }
            trace!(attempts, "type 0 identity search complete");

            let mut id = blank(IdentityType::C25519);
            id.public[..TYPE0_PUBLIC_KEY_SIZE].copy_from_slice(&public);
            id.private[..TYPE0_PRIVATE_KEY_SIZE].copy_from_slice(&private);
            private.zeroize();
            id.has_private = true;
            id.fp = Fingerprint {
                address,
                hash: hash::sha384(&[&id.public[..TYPE0_PUBLIC_KEY_SIZE]]),
            };
            return id;
        }
    }

    fn generate_p384() -> Identity {
        let mut public = [0u8; TYPE1_PUBLIC_KEY_SIZE];
        let mut private = Zeroizing::new([0u8; TYPE1_PRIVATE_KEY_SIZE]);
        let mut attempts = 0u64;
        loop {
            public[0] = 0;
            let (c_public, mut c_private) = c25519::generate_combined();
            public[T1_PUB_C25519..T1_PUB_P384].copy_from_slice(&c_public);
            private[..T1_PRIV_P384].copy_from_slice(&c_private);
            c_private.zeroize();
            let (p_public, mut p_private) = ecc384::generate();
            public[T1_PUB_P384..].copy_from_slice(&p_public);
            private[T1_PRIV_P384..].copy_from_slice(&p_private);
            p_private.zeroize();

            // The nonce is only eight bits; regenerate the faster P-384
            // pair each time it wraps and keep grinding.
            loop {
                attempts += 1;
                if pow::v1_pow_criterion(&public) {
                    break;
                }
                public[0] = public[0].wrapping_add(1);
                if public[0] == 0 {
                    let (p_public, mut p_private) = ecc384::generate();
                    public[T1_PUB_P384..].copy_from_slice(&p_public);
                    private[T1_PRIV_P384..].copy_from_slice(&p_private);
                    p_private.zeroize();
                }
            }

            let fp_hash = hash::sha384(&[&public[..]]);
            let mut wire = [0u8; ADDRESS_SIZE];
            wire.copy_from_slice(&fp_hash[..ADDRESS_SIZE]);
            let address = Address::from(wire);
            if address.is_reserved() {
                continue;
            }
            trace!(attempts, "type 1 identity search complete");

            let mut id = blank(IdentityType::P384);
            id.public = public;
            id.private = *private;
            id.has_private = true;
            id.fp = Fingerprint {
                address,
                hash: fp_hash,
            };
            return id;
        }
    }

    /// The identity's type tag.
    pub fn kind(&self) -> IdentityType {
        self.kind
    }

    /// The identity's routable address.
    pub fn address(&self) -> Address {
        self.fp.address
    }

    /// The identity's fingerprint.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fp
    }

    /// Whether this identity carries its private key.
    pub fn has_private(&self) -> bool {
        self.has_private
    }

    /// The type-specific public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public[..self.kind.public_key_size()]
    }

    /// Re-derive this identity's proof-of-work and check the address and
    /// hash bindings.
    ///
    /// Anything that fails here was forged, corrupted, or never finished
    /// generation. Type 0 validation allocates the 2 MiB proof-of-work
    /// scratch buffer.
    pub fn locally_validate(&self) -> bool {
        if self.fp.is_zero() || self.fp.address.is_reserved() {
            return false;
        }
        match self.kind {
            IdentityType::C25519 => {
                let mut digest = [0u8; 64];
                let mut genmem = vec![0u8; pow::V0_IDENTITY_GEN_MEMORY];
                pow::v0_frankenhash(
                    &self.public[..TYPE0_PUBLIC_KEY_SIZE],
                    &mut digest,
                    &mut genmem,
                );
                let mut wire = [0u8; ADDRESS_SIZE];
                wire.copy_from_slice(&digest[pow::V0_ADDRESS_DIGEST_OFFSET..][..ADDRESS_SIZE]);
                digest[0] < pow::V0_POW_THRESHOLD && Address::from(wire) == self.fp.address
            }
            IdentityType::P384 => {
                let mut wire = [0u8; ADDRESS_SIZE];
                wire.copy_from_slice(&self.fp.hash[..ADDRESS_SIZE]);
                Address::from(wire) == self.fp.address && pow::v1_pow_criterion(&self.public)
            }
        }
    }

    /// Sign `data`, returning the 96-byte signature for this identity's
    /// type.
    ///
    /// Type-1 signatures are computed over SHA-384(data ‖ public key);
    /// binding the public key in forecloses replaying a signature against
    /// another identity.
    ///
    /// # Errors
    ///
    /// [`IdentityError::OperationUnavailable`] if this identity has no
    /// private key.
    pub fn sign(&self, data: &[u8]) -> Result<[u8; IDENTITY_SIGNATURE_SIZE]> {
        if !self.has_private {
            return Err(IdentityError::OperationUnavailable);
        }
        match self.kind {
            IdentityType::C25519 => {
                let mut private = Zeroizing::new([0u8; TYPE0_PRIVATE_KEY_SIZE]);
                private.copy_from_slice(&self.private[..TYPE0_PRIVATE_KEY_SIZE]);
                Ok(c25519::sign(&private, data))
            }
            IdentityType::P384 => {
                let digest = hash::sha384(&[data, &self.public[..]]);
                Ok(ecc384::sign(&self.private[T1_PRIV_P384..], &digest)?)
            }
        }
    }

    /// Buffer-capacity variant of [`Identity::sign`] for host callers.
    ///
    /// Writes the signature into `signature` and returns the number of
    /// bytes written. Returns 0 — writing nothing — when the buffer is
    /// shorter than [`IDENTITY_SIGNATURE_SIZE`] or this identity cannot
    /// sign.
    pub fn sign_into(&self, data: &[u8], signature: &mut [u8]) -> usize {
        if signature.len() < IDENTITY_SIGNATURE_SIZE {
            return 0;
        }
        match self.sign(data) {
            Ok(sig) => {
                signature[..IDENTITY_SIGNATURE_SIZE].copy_from_slice(&sig);
                IDENTITY_SIGNATURE_SIZE
            }
            Err(_) => 0,
        }
    }

    /// Verify a signature over `data` against this identity's public key.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        match self.kind {
            IdentityType::C25519 => {
                let mut public = [0u8; TYPE0_PUBLIC_KEY_SIZE];
                public.copy_from_slice(&self.public[..TYPE0_PUBLIC_KEY_SIZE]);
                c25519::verify(&public, data, signature)
            }
            IdentityType::P384 => {
                if signature.len() != IDENTITY_SIGNATURE_SIZE {
                    return false;
                }
                let digest = hash::sha384(&[data, &self.public[..]]);
                ecc384::verify(&self.public[T1_PUB_P384..], &digest, signature)
            }
        }
    }

    /// Authenticated key agreement with another identity.
    ///
    /// Every type pairing involving a type-0 identity agrees over X25519
    /// alone (the X25519 half of a compound key sits at offset 1) and
    /// derives the key as the first 48 bytes of SHA-512 of the shared
    /// secret. Two type-1 identities run both X25519 and P-384 ECDH and
    /// derive the key as SHA-384 of the concatenated secrets, so the
    /// session stays protected while either curve stands.
    ///
    /// # Errors
    ///
    /// [`IdentityError::OperationUnavailable`] if this identity has no
    /// private key; a crypto error if the peer's P-384 key fails to
    /// decode.
    pub fn agree(&self, other: &Identity) -> Result<[u8; SYMMETRIC_KEY_SIZE]> {
        if !self.has_private {
            return Err(IdentityError::OperationUnavailable);
        }

        let mut my_c25519 = Zeroizing::new([0u8; c25519::COMBINED_PRIVATE_KEY_SIZE]);
        my_c25519.copy_from_slice(&self.private[..c25519::COMBINED_PRIVATE_KEY_SIZE]);
        let mut peer_ecdh = [0u8; c25519::ECDH_PUBLIC_KEY_SIZE];
        match other.kind {
            IdentityType::C25519 => {
                peer_ecdh.copy_from_slice(&other.public[..c25519::ECDH_PUBLIC_KEY_SIZE]);
            }
            IdentityType::P384 => {
                peer_ecdh.copy_from_slice(
                    &other.public[T1_PUB_C25519..T1_PUB_C25519 + c25519::ECDH_PUBLIC_KEY_SIZE],
                );
            }
        }

        match (self.kind, other.kind) {
            (IdentityType::P384, IdentityType::P384) => {
                let c_shared = Zeroizing::new(c25519::agree(&my_c25519, &peer_ecdh));
                let p_shared = Zeroizing::new(ecc384::agree(
                    &other.public[T1_PUB_P384..],
                    &self.private[T1_PRIV_P384..],
                )?);
                Ok(hash::sha384(&[&c_shared[..], &p_shared[..]]))
            }
            _ => {
                let shared = Zeroizing::new(c25519::agree(&my_c25519, &peer_ecdh));
                let digest = Zeroizing::new(hash::sha512(&[&shared[..]]));
                let mut key = [0u8; SYMMETRIC_KEY_SIZE];
                key.copy_from_slice(&digest[..SYMMETRIC_KEY_SIZE]);
                Ok(key)
            }
        }
    }

    /// SHA-384 of the public key concatenated with the private key, or all
    /// zeros when this identity is public-only.
    ///
    /// Unlike the fingerprint hash this covers the private half, so it
    /// only matches between two copies of the same full identity.
    pub fn hash_with_private(&self) -> [u8; FINGERPRINT_HASH_SIZE] {
        if !self.has_private {
            return [0u8; FINGERPRINT_HASH_SIZE];
        }
        let pub_len = self.kind.public_key_size();
        let priv_len = self.kind.private_key_size();
        hash::sha384(&[&self.public[..pub_len], &self.private[..priv_len]])
    }

    /// Encode to the binary wire form.
    ///
    /// Layout: address (5, big-endian) ‖ type tag (1) ‖ public key ‖
    /// private-key length (1) ‖ private key. The private key is included
    /// only when `include_private` is set and this identity has one;
    /// otherwise the length byte is zero.
    pub fn to_bytes(&self, include_private: bool) -> Vec<u8> {
        let mut out = Vec::with_capacity(IDENTITY_MARSHAL_SIZE_MAX);
        out.extend_from_slice(&self.fp.address.to_bytes());
        out.push(self.kind.tag());
        out.extend_from_slice(&self.public[..self.kind.public_key_size()]);
        if include_private && self.has_private {
            let priv_len = self.kind.private_key_size();
            out.push(priv_len as u8);
            out.extend_from_slice(&self.private[..priv_len]);
        } else {
            out.push(0);
        }
        out
    }

    /// Decode the binary wire form, returning the identity and the number
    /// of bytes consumed. Trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// [`IdentityError::MalformedInput`] for truncated buffers, reserved
    /// addresses, unknown type tags, or unexpected private-key lengths;
    /// [`IdentityError::InvalidIdentity`] when a type-1 identity's stored
    /// address does not match its key hash.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Identity, usize)> {
        if bytes.len() < ADDRESS_SIZE + 1 {
            return Err(IdentityError::MalformedInput("identity truncated"));
        }
        let address = Address::from_bytes(bytes)?;
        if address.is_reserved() {
            return Err(IdentityError::MalformedInput("reserved address"));
        }
        let kind = IdentityType::try_from(bytes[ADDRESS_SIZE])?;

        let pub_len = kind.public_key_size();
        let pub_end = ADDRESS_SIZE + 1 + pub_len;
        if bytes.len() < pub_end + 1 {
            return Err(IdentityError::MalformedInput("identity truncated"));
        }

        let mut id = blank(kind);
        id.public[..pub_len].copy_from_slice(&bytes[ADDRESS_SIZE + 1..pub_end]);
        id.fp = Fingerprint {
            address,
            hash: hash::sha384(&[&id.public[..pub_len]]),
        };
        if kind == IdentityType::P384 {
            let mut wire = [0u8; ADDRESS_SIZE];
            wire.copy_from_slice(&id.fp.hash[..ADDRESS_SIZE]);
            if Address::from(wire) != address {
                return Err(IdentityError::InvalidIdentity);
            }
        }

        let priv_len = kind.private_key_size();
        match bytes[pub_end] as usize {
            0 => Ok((id, pub_end + 1)),
            n if n == priv_len => {
                let end = pub_end + 1 + priv_len;
                if bytes.len() < end {
                    return Err(IdentityError::MalformedInput("identity truncated"));
                }
                id.private[..priv_len].copy_from_slice(&bytes[pub_end + 1..end]);
                id.has_private = true;
                Ok((id, end))
            }
            _ => Err(IdentityError::MalformedInput("unexpected private key length")),
        }
    }

    /// Encode to the text form: `address:type:public[:private]`.
    ///
    /// Type-0 key fields are lowercase hex; type-1 key fields are unpadded
    /// lowercase RFC 4648 base32. The private field appears only when
    /// `include_private` is set and this identity has a private key.
    pub fn to_text(&self, include_private: bool) -> String {
        let mut out = String::with_capacity(IDENTITY_STRING_SIZE_MAX);
        out.push_str(&self.fp.address.to_string());
        match self.kind {
            IdentityType::C25519 => {
                out.push_str(":0:");
                out.push_str(&hex::encode(&self.public[..TYPE0_PUBLIC_KEY_SIZE]));
                if include_private && self.has_private {
                    out.push(':');
                    out.push_str(&hex::encode(&self.private[..TYPE0_PRIVATE_KEY_SIZE]));
                }
            }
            IdentityType::P384 => {
                out.push_str(":1:");
                out.push_str(&base32::encode(TEXT_BASE32, &self.public[..]));
                if include_private && self.has_private {
                    out.push(':');
                    out.push_str(&base32::encode(TEXT_BASE32, &self.private[..]));
                }
            }
        }
        out
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    /// Parse the text form. Three fields yield a public-only identity;
    /// four include the private key. The fingerprint is re-derived, and a
    /// type-1 identity's address must match its key hash.
    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        if fields.len() < 3 || fields.len() > 4 {
            return Err(IdentityError::MalformedInput(
                "expected address:type:public[:private]",
            ));
        }

        let address: Address = fields[0].parse()?;
        if address.is_reserved() {
            return Err(IdentityError::MalformedInput("reserved address"));
        }
        let kind = match fields[1] {
            "0" => IdentityType::C25519,
            "1" => IdentityType::P384,
            _ => return Err(IdentityError::MalformedInput("unknown identity type")),
        };

        let mut id = blank(kind);
        let pub_len = kind.public_key_size();
        let public = match kind {
            IdentityType::C25519 => hex::decode(fields[2])
                .map_err(|_| IdentityError::MalformedInput("public key is not valid hex"))?,
            IdentityType::P384 => base32::decode(TEXT_BASE32, fields[2])
                .ok_or(IdentityError::MalformedInput("public key is not valid base32"))?,
        };
        if public.len() != pub_len {
            return Err(IdentityError::MalformedInput("public key has wrong length"));
        }
        id.public[..pub_len].copy_from_slice(&public);

        if let Some(field) = fields.get(3) {
            let priv_len = kind.private_key_size();
            let mut private = match kind {
                IdentityType::C25519 => hex::decode(field)
                    .map_err(|_| IdentityError::MalformedInput("private key is not valid hex"))?,
                IdentityType::P384 => base32::decode(TEXT_BASE32, field)
                    .ok_or(IdentityError::MalformedInput("private key is not valid base32"))?,
            };
            if private.len() != priv_len {
                private.zeroize();
                return Err(IdentityError::MalformedInput("private key has wrong length"));
            }
            id.private[..priv_len].copy_from_slice(&private);
            private.zeroize();
            id.has_private = true;
        }

        id.fp = Fingerprint {
            address,
            hash: hash::sha384(&[&id.public[..pub_len]]),
        };
        if kind == IdentityType::P384 {
            let mut wire = [0u8; ADDRESS_SIZE];
            wire.copy_from_slice(&id.fp.hash[..ADDRESS_SIZE]);
            if Address::from(wire) != address {
                return Err(IdentityError::InvalidIdentity);
            }
        }
        Ok(id)
    }
}

impl fmt::Display for Identity {
    /// The text form without the private key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("kind", &self.kind)
            .field("address", &self.fp.address)
            .field("has_private", &self.has_private)
            .finish()
    }
}

impl PartialEq for Identity {
    /// Equality covers the type, public key, and fingerprint; the private
    /// half does not participate.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.fp == other.fp
            && self.public[..self.kind.public_key_size()]
                == other.public[..other.kind.public_key_size()]
    }
}

impl Eq for Identity {}

impl std::hash::Hash for Identity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.tag().hash(state);
        self.fp.hash(state);
    }
}

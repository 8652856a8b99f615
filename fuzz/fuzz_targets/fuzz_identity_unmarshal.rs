//! Fuzz target for the identity wire decoder.
//!
//! Decoding arbitrary buffers must never panic, the consumed length must
//! stay in bounds, and a decoded identity must re-encode to exactly the
//! bytes consumed.

#![no_main]

use libfuzzer_sys::fuzz_target;
use plexus_identity::Identity;

fuzz_target!(|data: &[u8]| {
    if let Ok((id, consumed)) = Identity::from_bytes(data) {
        assert!(consumed <= data.len());
        assert_eq!(id.to_bytes(id.has_private()), &data[..consumed]);
    }
});

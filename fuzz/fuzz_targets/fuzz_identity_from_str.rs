//! Fuzz target for the identity text parser.
//!
//! Parsing arbitrary strings must never panic, and anything that parses
//! must re-encode to a string that parses to the same identity.

#![no_main]

use libfuzzer_sys::fuzz_target;
use plexus_identity::Identity;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(id) = s.parse::<Identity>() {
            let text = id.to_text(id.has_private());
            let roundtrip: Identity = text.parse().unwrap();
            assert_eq!(id, roundtrip);
            assert_eq!(roundtrip.to_text(id.has_private()), text);
        }
    }
});

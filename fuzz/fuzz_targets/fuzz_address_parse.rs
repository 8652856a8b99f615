//! Fuzz target for address parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use plexus_identity::Address;

fuzz_target!(|data: &[u8]| {
    let _ = Address::from_bytes(data);
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(addr) = s.parse::<Address>() {
            assert_eq!(addr.to_string().parse::<Address>().unwrap(), addr);
        }
    }
});

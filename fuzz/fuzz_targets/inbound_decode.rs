//! Fuzz target for `Inbound::decode`
//!
//! Server frames are untrusted text. Decoding must classify every input as a
//! reply, a broadcast or an error, and never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use shello_proto::Inbound;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(inbound) = Inbound::decode(&text) {
        // Every decoded frame names its discriminator.
        assert!(!inbound.name().is_empty());
    }
});

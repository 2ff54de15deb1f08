//! Fuzz target for store snapshot JSON parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run snapshot_json_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use stagecoord::store::snapshot::from_json_str;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    let _ = from_json_str(json);
});

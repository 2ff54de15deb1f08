//! Fuzz target for conversion matrix parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run conversion_matrix_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use stagecoord::transform::{parse_coefficients, AffineDescriptor};

fuzz_target!(|data: &[u8]| {
    // Metadata values are text; anything else never reaches the parser.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(raw) = parse_coefficients(text) {
        // Accepted input is always six finite numbers.
        assert!(raw.iter().all(|v| v.is_finite()));
        let descriptor = AffineDescriptor::from_raw(raw);
        let _ = descriptor.apply(stagecoord::model::Coord::new(1.0, 1.0));
    }
});

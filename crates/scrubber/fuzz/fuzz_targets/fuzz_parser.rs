//! Fuzz target for the delimited-file parser.
//!
//! Checks that the parser never panics on malformed input, for any
//! delimiter and with or without a header row.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrubber::{Parser, ParserConfig};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 || data.is_empty() {
        return;
    }

    // First byte picks the delimiter, the rest is the file body.
    let delimiter = match data[0] % 4 {
        0 => b',',
        1 => b'\t',
        2 => b';',
        _ => b'|',
    };
    let body = &data[1..];

    let _ = Parser::new().parse_bytes(body, delimiter);
    let _ = Parser::with_config(ParserConfig::default().without_header()).parse_bytes(body, delimiter);
});

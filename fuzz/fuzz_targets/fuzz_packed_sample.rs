//! Fuzzes the packed 21-bit sample format.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_packed_sample
#![no_main]
use hid_rift_protocol::{SAMPLE_MAX, SAMPLE_MIN, decode_sample, encode_sample};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|packed: [u8; 8]| {
    let axes = decode_sample(&packed);
    assert!(axes.iter().all(|axis| (SAMPLE_MIN..=SAMPLE_MAX).contains(axis)));
    assert_eq!(decode_sample(&encode_sample(axes)), axes);
});

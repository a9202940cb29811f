//! Fuzzes the bounded report cursor with arbitrary read widths.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_report_parser
#![no_main]
use hmd_hid_common::ReportParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u8>, Vec<u8>)| {
    let (data, widths) = input;
    let mut parser = ReportParser::new(&data);
    for width in widths {
        let before = parser.position();
        match width % 6 {
            0 => drop(parser.read_u8()),
            1 => drop(parser.read_u16_le()),
            2 => drop(parser.read_i16_le()),
            3 => drop(parser.read_u32_le()),
            4 => drop(parser.read_i32_le()),
            _ => drop(parser.skip(usize::from(width))),
        }
        assert!(parser.position() >= before);
        assert!(parser.position() <= data.len());
    }
});

//! Fuzzes the tracker interrupt report decoders.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_tracker_report
#![no_main]
use hid_rift_protocol::{TrackerSensorMessage, decode_tracker_report};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes.
    let _ = TrackerSensorMessage::decode_gen1(data);
    let _ = TrackerSensorMessage::decode_gen2(data);

    if let Ok(message) = decode_tracker_report(data) {
        let max = message.generation.max_samples();
        assert!(usize::from(message.num_samples) <= max);
        assert_eq!(message.samples().len(), usize::from(message.num_samples));
    }
});

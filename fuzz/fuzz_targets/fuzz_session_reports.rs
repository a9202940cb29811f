//! Feeds arbitrary interrupt reports through a session.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_session_reports
#![no_main]
use hmd_tracker_session::{DeviceSession, RecordingSink};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|reports: Vec<Vec<u8>>| {
    let mut session = DeviceSession::default();
    let mut sink = RecordingSink::new();
    for report in reports {
        let before = session.last_timestamp();
        if session.handle_report(&report, &mut sink).is_err() {
            assert_eq!(session.last_timestamp(), before);
        }
    }
    assert!(sink.samples().all(|sample| sample.dt > 0.0));
});

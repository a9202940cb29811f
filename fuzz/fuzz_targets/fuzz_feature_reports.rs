//! Fuzzes the feature report decoders and the sensor config encoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_feature_reports
#![no_main]
use hid_rift_protocol::{DisplayInfo, SENSOR_CONFIG_REPORT_LEN, SensorConfig, SensorRange};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = SensorRange::decode(data);
    let _ = DisplayInfo::decode(data);

    // A decoded config must survive a write and a second read.
    if let Ok(config) = SensorConfig::decode(data) {
        let mut out = [0u8; SENSOR_CONFIG_REPORT_LEN];
        config.encode(&mut out);
        assert_eq!(SensorConfig::decode(&out).ok(), Some(config));
    }
});

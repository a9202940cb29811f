//! HID report codec for Rift-family HMD motion trackers.
//!
//! The tracker exposes an inertial measurement unit (accelerometer, gyroscope,
//! magnetometer) over USB HID. Configuration travels in feature reports and
//! samples arrive in interrupt reports. This crate decodes and encodes those
//! reports; it performs no I/O.
//!
//! ## Report set
//!
//! | Tag  | Kind      | Record                   | Accepted sizes |
//! |------|-----------|--------------------------|----------------|
//! | 2    | feature   | [`SensorConfig`]         | 7, 8           |
//! | 4    | feature   | [`SensorRange`]          | 8, 9           |
//! | 8    | feature   | [`KeepAlive`] (write)    | n/a            |
//! | 9    | feature   | [`DisplayInfo`]          | 56, 57         |
//! | 1    | interrupt | gen 1 tracker message    | 62, 64         |
//! | 11   | interrupt | gen 2 tracker message    | 64             |
//!
//! All multi-byte fields are little-endian apart from the packed inertial
//! samples, which are big-endian 21-bit triples (see [`sample`]).
//!
//! ## Modules
//!
//! - **`ids`**: report tags, opaque vendor commands, USB identifiers
//! - **`types`**: typed records
//! - **`input`**: decoders, including the [`decode_tracker_report`] dispatcher
//! - **`output`**: encoders for the configuration and keep-alive commands
//! - **`sample`**: the packed tri-axis sample format

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod input;
pub mod output;
pub mod sample;
pub mod types;

pub use ids::*;
pub use input::*;
pub use output::*;
pub use sample::{PACKED_SAMPLE_LEN, SAMPLE_MAX, SAMPLE_MIN, decode_sample, encode_sample};
pub use types::*;

use hmd_hid_common::HidCommonError;
use thiserror::Error;

/// Errors returned by codec operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiftError {
    #[error("Invalid {record} report size: expected one of {expected:?}, got {actual}")]
    InvalidReportSize {
        record: &'static str,
        expected: &'static [usize],
        actual: usize,
    },

    #[error("Report truncated at offset {offset}: wanted {wanted} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },

    #[error("Unknown report tag: {0:#04x}")]
    UnknownReportTag(u8),

    #[error("Communication error: {0}")]
    Communication(String),
}

impl RiftError {
    /// `true` when the input had the wrong length for its record.
    pub fn is_malformed_length(&self) -> bool {
        matches!(
            self,
            RiftError::InvalidReportSize { .. } | RiftError::Truncated { .. }
        )
    }
}

/// Convenience result alias for codec operations.
pub type RiftResult<T> = Result<T, RiftError>;

impl From<HidCommonError> for RiftError {
    fn from(e: HidCommonError) -> Self {
        match e {
            HidCommonError::Truncated {
                offset,
                wanted,
                remaining,
            } => RiftError::Truncated {
                offset,
                wanted,
                remaining,
            },
            other => RiftError::Communication(other.to_string()),
        }
    }
}

/// Accepted lengths of a sensor range feature report.
pub const SENSOR_RANGE_SIZES: &[usize] = &[8, 9];
/// Accepted lengths of a sensor config feature report.
pub const SENSOR_CONFIG_SIZES: &[usize] = &[7, 8];
/// Accepted lengths of a display info feature report.
pub const DISPLAY_INFO_SIZES: &[usize] = &[56, 57];
/// Accepted lengths of a gen 1 tracker interrupt report.
pub const TRACKER_GEN1_SIZES: &[usize] = &[62, 64];
/// Accepted lengths of a gen 2 tracker interrupt report.
pub const TRACKER_GEN2_SIZES: &[usize] = &[64];

/// Encoded length of a sensor config command.
pub const SENSOR_CONFIG_REPORT_LEN: usize = 7;
/// Encoded length of a keep-alive command.
pub const KEEP_ALIVE_REPORT_LEN: usize = 5;

/// Wire size of one sample slot: packed accel then packed gyro.
pub const SAMPLE_SLOT_LEN: usize = 2 * PACKED_SAMPLE_LEN;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_maps_to_malformed_length() {
        let err: RiftError = HidCommonError::Truncated {
            offset: 3,
            wanted: 2,
            remaining: 1,
        }
        .into();
        assert!(err.is_malformed_length());
        assert_eq!(
            err,
            RiftError::Truncated {
                offset: 3,
                wanted: 2,
                remaining: 1
            }
        );
    }

    #[test]
    fn test_transport_error_maps_to_communication() {
        let err: RiftError = HidCommonError::Disconnected.into();
        assert!(!err.is_malformed_length());
        assert!(matches!(err, RiftError::Communication(_)));
    }

    #[test]
    fn test_error_display() {
        let err = RiftError::InvalidReportSize {
            record: "sensor config",
            expected: SENSOR_CONFIG_SIZES,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid sensor config report size: expected one of [7, 8], got 3"
        );
        assert_eq!(
            RiftError::UnknownReportTag(0x1D).to_string(),
            "Unknown report tag: 0x1d"
        );
    }
}

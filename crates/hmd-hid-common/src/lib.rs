//! Common HID plumbing for HMD tracker protocol implementations
//!
//! This crate provides the pieces shared between the wire codec and the
//! device session:
//! - [`ReportParser`] / [`ReportBuilder`]: bounded cursor and writer over report bytes
//! - [`HidTransport`]: the feature/interrupt report interface the session drives
//! - [`mock::MockTransport`]: a scripted device for tests and simulations
//! - `HidApiTransport` (feature `hidapi`): a transport backed by the `hidapi` crate

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod hid_traits;
#[cfg(feature = "hidapi")]
pub mod hidapi_transport;
pub mod report_parser;

pub use device_info::*;
pub use hid_traits::*;
#[cfg(feature = "hidapi")]
pub use hidapi_transport::HidApiTransport;
pub use report_parser::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open device: {0}")]
    OpenError(String),

    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Report truncated at offset {offset}: wanted {wanted} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },

    #[error("Device disconnected")]
    Disconnected,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HidCommonError {
    /// `true` for errors raised by the device or the OS rather than by report parsing.
    pub fn is_transport(&self) -> bool {
        !matches!(self, HidCommonError::Truncated { .. })
    }
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;

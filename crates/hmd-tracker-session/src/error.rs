//! Error types for the device session.

use hid_rift_protocol::RiftError;
use hmd_hid_common::HidCommonError;
use thiserror::Error;

/// Errors surfaced by [`DeviceSession`](crate::DeviceSession) operations.
///
/// Frame divergence after synchronization is not an error; it is reported
/// through [`FrameSync`](crate::FrameSync).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The transport failed to read or write a report.
    #[error("Transport error: {0}")]
    Transport(#[from] HidCommonError),

    /// A report could not be decoded.
    #[error("Protocol error: {0}")]
    Protocol(#[from] RiftError),

    /// The session configuration was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The operation needs the device config, which `start` reads.
    #[error("Session not started")]
    NotStarted,
}

impl SessionError {
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// `true` for device or OS failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// `true` when a report had the wrong length for its record.
    pub fn is_malformed_length(&self) -> bool {
        matches!(self, Self::Protocol(e) if e.is_malformed_length())
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

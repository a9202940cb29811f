//! Session configuration.

use hid_rift_protocol::CoordinateFrame;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{SessionError, SessionResult};

/// Command sent to keep the device streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepAliveCommand {
    /// The opaque vendor ping (`11 00 00 0B 10 27`).
    #[default]
    VendorPing,
    /// Feature report 8 carrying the current keep-alive interval.
    KeepAliveReport,
}

/// Options for a [`DeviceSession`](crate::DeviceSession).
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frame requested from the device during synchronization.
    pub coordinate_frame: CoordinateFrame,
    /// Packet interval written to the device; `None` keeps the device's value.
    pub packet_interval: Option<u8>,
    /// Keep-alive interval written to the device; `None` keeps the device's value.
    pub keep_alive_interval_ms: Option<u16>,
    /// Interval assumed when the device reports a keep-alive interval of 0.
    pub fallback_keep_alive_interval_ms: u16,
    /// How long before the interval expires the keep-alive is sent.
    pub keep_alive_margin_ms: u64,
    pub keep_alive_command: KeepAliveCommand,
    /// Timeout of the interrupt read in [`poll`](crate::DeviceSession::poll).
    pub read_timeout_ms: u64,
    /// Read the range and display info reports during start.
    pub query_device_info: bool,
    /// Send the set-streaming-parameters vendor command during start.
    pub send_streaming_parameters: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            coordinate_frame: CoordinateFrame::Hmd,
            packet_interval: Some(1),
            keep_alive_interval_ms: None,
            fallback_keep_alive_interval_ms: 10_000,
            keep_alive_margin_ms: 200,
            keep_alive_command: KeepAliveCommand::VendorPing,
            read_timeout_ms: 100,
            query_device_info: true,
            send_streaming_parameters: false,
        }
    }
}

impl SessionConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfiguration`] if an interval is zero
    /// or the keep-alive margin swallows the whole interval.
    pub fn validate(&self) -> SessionResult<()> {
        if self.packet_interval == Some(0) {
            return Err(SessionError::invalid_configuration(
                "packet_interval must be greater than 0",
            ));
        }
        if self.keep_alive_interval_ms == Some(0) {
            return Err(SessionError::invalid_configuration(
                "keep_alive_interval_ms must be greater than 0",
            ));
        }
        if self.fallback_keep_alive_interval_ms == 0 {
            return Err(SessionError::invalid_configuration(
                "fallback_keep_alive_interval_ms must be greater than 0",
            ));
        }
        let interval = self
            .keep_alive_interval_ms
            .unwrap_or(self.fallback_keep_alive_interval_ms);
        if self.keep_alive_margin_ms >= u64::from(interval) {
            return Err(SessionError::invalid_configuration(
                "keep_alive_margin_ms must be shorter than the keep-alive interval",
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err(SessionError::invalid_configuration(
                "read_timeout_ms must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn keep_alive_margin(&self) -> Duration {
        Duration::from_millis(self.keep_alive_margin_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() -> SessionResult<()> {
        let config = SessionConfig::default();
        config.validate()?;
        assert_eq!(config.keep_alive_margin(), Duration::from_millis(200));
        assert_eq!(config.read_timeout(), Duration::from_millis(100));
        assert_eq!(config.packet_interval, Some(1));
        Ok(())
    }

    #[test]
    fn test_zero_read_timeout_rejected() {
        let config = SessionConfig {
            read_timeout_ms: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SessionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_margin_longer_than_interval_rejected() {
        let config = SessionConfig {
            keep_alive_interval_ms: Some(150),
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() -> Result<(), serde_json::Error> {
        let config: SessionConfig =
            serde_json::from_str(r#"{"coordinate_frame":"sensor","keep_alive_command":"keep_alive_report"}"#)?;
        assert_eq!(config.coordinate_frame, CoordinateFrame::Sensor);
        assert_eq!(config.keep_alive_command, KeepAliveCommand::KeepAliveReport);
        assert_eq!(config.keep_alive_margin_ms, 200);
        assert_eq!(config.fallback_keep_alive_interval_ms, 10_000);
        Ok(())
    }
}

//! Encoders for commands sent to the tracker as feature reports.

use crate::ids::{feature_ids, vendor_commands};
use crate::types::{KeepAlive, SensorConfig};
use crate::{KEEP_ALIVE_REPORT_LEN, SENSOR_CONFIG_REPORT_LEN};
use hmd_hid_common::ReportBuilder;

impl SensorConfig {
    /// Write tag 2 and the config fields into `out`; returns the byte count.
    pub fn encode(&self, out: &mut [u8; SENSOR_CONFIG_REPORT_LEN]) -> usize {
        let [id_lo, id_hi] = self.command_id.to_le_bytes();
        let [ka_lo, ka_hi] = self.keep_alive_interval.to_le_bytes();
        *out = [
            feature_ids::SENSOR_CONFIG,
            id_lo,
            id_hi,
            self.flags.bits(),
            self.packet_interval,
            ka_lo,
            ka_hi,
        ];
        SENSOR_CONFIG_REPORT_LEN
    }

    /// Owned feature report, ready for `send_feature_report`.
    pub fn to_report(&self) -> Vec<u8> {
        let mut builder = ReportBuilder::with_capacity(SENSOR_CONFIG_REPORT_LEN);
        builder
            .write_u8(feature_ids::SENSOR_CONFIG)
            .write_u16_le(self.command_id)
            .write_u8(self.flags.bits())
            .write_u8(self.packet_interval)
            .write_u16_le(self.keep_alive_interval);
        builder.into_inner()
    }
}

impl KeepAlive {
    /// Write tag 8, the command id and the interval into `out`.
    pub fn encode(&self, out: &mut [u8; KEEP_ALIVE_REPORT_LEN]) -> usize {
        let [id_lo, id_hi] = self.command_id.to_le_bytes();
        let [ka_lo, ka_hi] = self.keep_alive_interval.to_le_bytes();
        *out = [feature_ids::KEEP_ALIVE, id_lo, id_hi, ka_lo, ka_hi];
        KEEP_ALIVE_REPORT_LEN
    }

    pub fn to_report(&self) -> Vec<u8> {
        let mut builder = ReportBuilder::with_capacity(KEEP_ALIVE_REPORT_LEN);
        builder
            .write_u8(feature_ids::KEEP_ALIVE)
            .write_u16_le(self.command_id)
            .write_u16_le(self.keep_alive_interval);
        builder.into_inner()
    }
}

/// Copy the ping command into `out`; returns the byte count.
pub fn encode_ping(out: &mut [u8; vendor_commands::PING.len()]) -> usize {
    *out = vendor_commands::PING;
    out.len()
}

/// Copy the set-streaming-parameters command into `out`.
pub fn encode_streaming_parameters(
    out: &mut [u8; vendor_commands::STREAMING_PARAMETERS.len()],
) -> usize {
    *out = vendor_commands::STREAMING_PARAMETERS;
    out.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorConfigFlags;

    #[test]
    fn test_sensor_config_encode_layout() {
        let config = SensorConfig {
            command_id: 0x1234,
            flags: SensorConfigFlags::from_bits(0x60),
            packet_interval: 1,
            keep_alive_interval: 10_000,
        };
        let mut out = [0u8; SENSOR_CONFIG_REPORT_LEN];
        assert_eq!(config.encode(&mut out), 7);
        assert_eq!(out, [0x02, 0x34, 0x12, 0x60, 0x01, 0x10, 0x27]);
        assert_eq!(config.to_report(), out.to_vec());
    }

    #[test]
    fn test_keep_alive_encode_layout() {
        let keep_alive = KeepAlive::new(0, 10_000);
        let mut out = [0u8; KEEP_ALIVE_REPORT_LEN];
        assert_eq!(keep_alive.encode(&mut out), 5);
        assert_eq!(out, [0x08, 0x00, 0x00, 0x10, 0x27]);
        assert_eq!(keep_alive.to_report(), out.to_vec());
    }

    #[test]
    fn test_vendor_commands_are_verbatim() {
        let mut ping = [0u8; 6];
        assert_eq!(encode_ping(&mut ping), 6);
        assert_eq!(ping, [0x11, 0x00, 0x00, 0x0B, 0x10, 0x27]);

        let mut streaming = [0u8; 7];
        assert_eq!(encode_streaming_parameters(&mut streaming), 7);
        assert_eq!(streaming, [0x02, 0x00, 0x00, 0x20, 0x01, 0xE8, 0x03]);
    }
}

//! Decoders for feature and interrupt reports.
//!
//! Every decoder checks the buffer length against the record's accepted size
//! set before reading anything, then walks the fields with a bounded
//! [`ReportParser`]. The leading tag byte is skipped, not validated: callers
//! pick the decoder from the tag (see [`decode_tracker_report`]).

use crate::ids::interrupt_ids;
use crate::sample::decode_sample;
use crate::types::{
    DisplayInfo, DistortionType, MAX_TRACKER_SAMPLES, SensorConfig, SensorConfigFlags,
    SensorRange, TrackerGeneration, TrackerSample, TrackerSensorMessage,
};
use crate::{
    DISPLAY_INFO_SIZES, RiftError, RiftResult, SAMPLE_SLOT_LEN, SENSOR_CONFIG_SIZES,
    SENSOR_RANGE_SIZES, TRACKER_GEN1_SIZES, TRACKER_GEN2_SIZES,
};
use hmd_hid_common::ReportParser;

/// Device timestamps in gen 1 reports count milliseconds.
const GEN1_TIMESTAMP_SCALE: u32 = 1000;
/// Lengths in the display info report are fixed-point millionths.
const FIXED_POINT_SCALE: f32 = 1_000_000.0;

fn check_size(record: &'static str, accepted: &'static [usize], data: &[u8]) -> RiftResult<()> {
    if accepted.contains(&data.len()) {
        Ok(())
    } else {
        Err(RiftError::InvalidReportSize {
            record,
            expected: accepted,
            actual: data.len(),
        })
    }
}

/// Open a cursor positioned after the tag byte.
fn body(data: &[u8]) -> RiftResult<ReportParser<'_>> {
    let mut parser = ReportParser::new(data);
    parser.skip(1)?;
    Ok(parser)
}

fn read_fixed(parser: &mut ReportParser<'_>) -> RiftResult<f32> {
    Ok(parser.read_i32_le()? as f32 / FIXED_POINT_SCALE)
}

fn read_samples(
    parser: &mut ReportParser<'_>,
    generation: TrackerGeneration,
    num_samples: usize,
) -> RiftResult<[TrackerSample; MAX_TRACKER_SAMPLES]> {
    let mut samples = [TrackerSample::default(); MAX_TRACKER_SAMPLES];
    for slot in samples.iter_mut().take(num_samples) {
        slot.accel = decode_sample(&parser.read_array()?);
        slot.gyro = decode_sample(&parser.read_array()?);
    }
    // Unused slots are still present on the wire.
    parser.skip((generation.max_samples() - num_samples) * SAMPLE_SLOT_LEN)?;
    Ok(samples)
}

fn read_mag(parser: &mut ReportParser<'_>) -> RiftResult<[i16; 3]> {
    Ok([
        parser.read_i16_le()?,
        parser.read_i16_le()?,
        parser.read_i16_le()?,
    ])
}

fn clamp_samples(raw: u8, generation: TrackerGeneration) -> usize {
    usize::from(raw).min(generation.max_samples())
}

impl SensorRange {
    /// Decode feature report 4.
    pub fn decode(data: &[u8]) -> RiftResult<Self> {
        check_size("sensor range", SENSOR_RANGE_SIZES, data)?;
        let mut parser = body(data)?;

        Ok(Self {
            command_id: parser.read_u16_le()?,
            accel_scale: parser.read_u8()?,
            gyro_scale: parser.read_u16_le()?,
            mag_scale: parser.read_u16_le()?,
        })
    }
}

impl SensorConfig {
    /// Decode feature report 2.
    pub fn decode(data: &[u8]) -> RiftResult<Self> {
        check_size("sensor config", SENSOR_CONFIG_SIZES, data)?;
        let mut parser = body(data)?;

        Ok(Self {
            command_id: parser.read_u16_le()?,
            flags: SensorConfigFlags::from_bits(parser.read_u8()?),
            packet_interval: parser.read_u8()?,
            keep_alive_interval: parser.read_u16_le()?,
        })
    }
}

impl DisplayInfo {
    /// Decode feature report 9.
    ///
    /// Each distortion coefficient occupies a 4-byte slot of which only the
    /// first byte is significant; it is widened to `f32` as an integer.
    pub fn decode(data: &[u8]) -> RiftResult<Self> {
        check_size("display info", DISPLAY_INFO_SIZES, data)?;
        let mut parser = body(data)?;

        let command_id = parser.read_u16_le()?;
        let distortion_type = DistortionType::from_raw(parser.read_u8()?);
        let h_resolution = parser.read_u16_le()?;
        let v_resolution = parser.read_u16_le()?;
        let h_screen_size = read_fixed(&mut parser)?;
        let v_screen_size = read_fixed(&mut parser)?;
        let v_center = read_fixed(&mut parser)?;
        let lens_separation = read_fixed(&mut parser)?;
        let eye_to_screen_distance = [read_fixed(&mut parser)?, read_fixed(&mut parser)?];

        let mut distortion_k = [0.0f32; 6];
        for k in &mut distortion_k {
            let [first, ..]: [u8; 4] = parser.read_array()?;
            *k = f32::from(first);
        }

        Ok(Self {
            command_id,
            distortion_type,
            h_resolution,
            v_resolution,
            h_screen_size,
            v_screen_size,
            v_center,
            lens_separation,
            eye_to_screen_distance,
            distortion_k,
        })
    }
}

impl TrackerSensorMessage {
    /// Decode a gen 1 (tag 1) interrupt report.
    ///
    /// The 16-bit device timestamp counts milliseconds and is scaled to
    /// microseconds.
    pub fn decode_gen1(data: &[u8]) -> RiftResult<Self> {
        check_size("gen 1 tracker", TRACKER_GEN1_SIZES, data)?;
        let generation = TrackerGeneration::Gen1;
        let mut parser = body(data)?;

        let num_samples = clamp_samples(parser.read_u8()?, generation);
        let timestamp = u32::from(parser.read_u16_le()?) * GEN1_TIMESTAMP_SCALE;
        let last_command_id = parser.read_u16_le()?;
        let temperature = parser.read_i16_le()?;
        let samples = read_samples(&mut parser, generation, num_samples)?;
        let mag = read_mag(&mut parser)?;

        Ok(Self {
            generation,
            last_command_id,
            num_samples: num_samples as u8,
            timestamp,
            temperature,
            samples,
            mag,
        })
    }

    /// Decode a gen 2 (tag 11) interrupt report.
    pub fn decode_gen2(data: &[u8]) -> RiftResult<Self> {
        check_size("gen 2 tracker", TRACKER_GEN2_SIZES, data)?;
        let generation = TrackerGeneration::Gen2;
        let mut parser = body(data)?;

        let last_command_id = parser.read_u16_le()?;
        let num_samples = clamp_samples(parser.read_u8()?, generation);
        // Running sample counter, not used.
        parser.skip(2)?;
        let temperature = parser.read_i16_le()?;
        let timestamp = parser.read_u32_le()?;
        let samples = read_samples(&mut parser, generation, num_samples)?;
        let mag = read_mag(&mut parser)?;

        Ok(Self {
            generation,
            last_command_id,
            num_samples: num_samples as u8,
            timestamp,
            temperature,
            samples,
            mag,
        })
    }
}

/// Decode an interrupt report, choosing the layout from its leading tag.
pub fn decode_tracker_report(data: &[u8]) -> RiftResult<TrackerSensorMessage> {
    let tag = ReportParser::new(data).peek_u8()?;
    match tag {
        interrupt_ids::TRACKER_GEN1 => TrackerSensorMessage::decode_gen1(data),
        interrupt_ids::TRACKER_GEN2 => TrackerSensorMessage::decode_gen2(data),
        other => Err(RiftError::UnknownReportTag(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::encode_sample;

    fn gen1_report(num_samples: u8, timestamp_ms: u16) -> [u8; 64] {
        let mut data = [0u8; 64];
        data[0] = interrupt_ids::TRACKER_GEN1;
        data[1] = num_samples;
        data[2..4].copy_from_slice(&timestamp_ms.to_le_bytes());
        data[4..6].copy_from_slice(&0x0102u16.to_le_bytes());
        data[6..8].copy_from_slice(&(-250i16).to_le_bytes());
        for slot in 0..3 {
            let offset = 8 + slot * SAMPLE_SLOT_LEN;
            let value = slot as i32 + 1;
            data[offset..offset + 8].copy_from_slice(&encode_sample([value, -value, 0]));
            data[offset + 8..offset + 16].copy_from_slice(&encode_sample([0, value, -value]));
        }
        data[56..58].copy_from_slice(&100i16.to_le_bytes());
        data[58..60].copy_from_slice(&(-200i16).to_le_bytes());
        data[60..62].copy_from_slice(&300i16.to_le_bytes());
        data
    }

    #[test]
    fn test_decode_sensor_config() -> Result<(), RiftError> {
        let config = SensorConfig::decode(&[0x02, 0x34, 0x12, 0x60, 0x01, 0x10, 0x27])?;
        assert_eq!(config.command_id, 0x1234);
        assert!(config.flags.sensor_coordinates());
        assert!(config.flags.command_keep_alive());
        assert_eq!(config.packet_interval, 1);
        assert_eq!(config.keep_alive_interval, 10_000);
        Ok(())
    }

    #[test]
    fn test_decode_sensor_config_rejects_short() {
        let result = SensorConfig::decode(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(
            result,
            Err(RiftError::InvalidReportSize { actual: 6, .. })
        ));
    }

    #[test]
    fn test_decode_sensor_range() -> Result<(), RiftError> {
        let range = SensorRange::decode(&[0x04, 0x00, 0x00, 0x04, 0xD0, 0x07, 0x00, 0x13])?;
        assert_eq!(range.accel_scale, 4);
        assert_eq!(range.gyro_scale, 2000);
        assert_eq!(range.mag_scale, 0x1300);
        Ok(())
    }

    #[test]
    fn test_decode_gen1_clamps_and_scales_timestamp() -> Result<(), RiftError> {
        let msg = TrackerSensorMessage::decode_gen1(&gen1_report(200, 16))?;
        assert_eq!(msg.generation, TrackerGeneration::Gen1);
        assert_eq!(msg.num_samples, 3);
        assert_eq!(msg.timestamp, 16_000);
        assert_eq!(msg.last_command_id, 0x0102);
        assert_eq!(msg.temperature, -250);
        assert_eq!(msg.samples[2].accel, [3, -3, 0]);
        assert_eq!(msg.mag, [100, -200, 300]);
        Ok(())
    }

    #[test]
    fn test_decode_gen1_zeroes_unused_slots() -> Result<(), RiftError> {
        let msg = TrackerSensorMessage::decode_gen1(&gen1_report(1, 0))?;
        assert_eq!(msg.samples().len(), 1);
        assert_eq!(msg.samples[0].gyro, [0, 1, -1]);
        assert_eq!(msg.samples[1], TrackerSample::default());
        assert_eq!(msg.mag, [100, -200, 300]);
        Ok(())
    }

    #[test]
    fn test_dispatch_unknown_tag() {
        let mut data = gen1_report(1, 0);
        data[0] = 0x1D;
        assert_eq!(
            decode_tracker_report(&data),
            Err(RiftError::UnknownReportTag(0x1D))
        );
    }

    #[test]
    fn test_dispatch_empty_is_truncated() {
        let err = decode_tracker_report(&[]);
        assert!(matches!(err, Err(ref e) if e.is_malformed_length()));
    }
}

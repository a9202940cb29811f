//! Typed records carried by feature and interrupt reports.

use serde::{Deserialize, Serialize};

use crate::ids::interrupt_ids;

/// Frame in which the device reports orientation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFrame {
    /// Relative to the sensor housing.
    Sensor,
    /// Relative to the headset body.
    #[default]
    Hmd,
}

/// Sensor configuration flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorConfigFlags(u8);

impl SensorConfigFlags {
    pub const RAW_MODE: u8 = 0x01;
    pub const CALIBRATION_TEST: u8 = 0x02;
    pub const USE_CALIBRATION: u8 = 0x04;
    pub const AUTO_CALIBRATION: u8 = 0x08;
    pub const MOTION_KEEP_ALIVE: u8 = 0x10;
    pub const COMMAND_KEEP_ALIVE: u8 = 0x20;
    pub const SENSOR_COORDINATES: u8 = 0x40;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn set(&mut self, flag: u8, enabled: bool) {
        if enabled {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    pub fn raw_mode(self) -> bool {
        self.contains(Self::RAW_MODE)
    }

    pub fn calibration_test(self) -> bool {
        self.contains(Self::CALIBRATION_TEST)
    }

    pub fn use_calibration(self) -> bool {
        self.contains(Self::USE_CALIBRATION)
    }

    pub fn auto_calibration(self) -> bool {
        self.contains(Self::AUTO_CALIBRATION)
    }

    pub fn motion_keep_alive(self) -> bool {
        self.contains(Self::MOTION_KEEP_ALIVE)
    }

    pub fn command_keep_alive(self) -> bool {
        self.contains(Self::COMMAND_KEEP_ALIVE)
    }

    pub fn sensor_coordinates(self) -> bool {
        self.contains(Self::SENSOR_COORDINATES)
    }
}

/// Sensor scale factors (feature report 4). Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorRange {
    pub command_id: u16,
    pub accel_scale: u8,
    pub gyro_scale: u16,
    pub mag_scale: u16,
}

/// Sensor configuration (feature report 2). Both read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorConfig {
    pub command_id: u16,
    pub flags: SensorConfigFlags,
    pub packet_interval: u8,
    /// Milliseconds.
    pub keep_alive_interval: u16,
}

impl SensorConfig {
    /// Frame implied by the sensor-coordinates flag.
    pub fn coordinate_frame(&self) -> CoordinateFrame {
        if self.flags.sensor_coordinates() {
            CoordinateFrame::Sensor
        } else {
            CoordinateFrame::Hmd
        }
    }

    pub fn set_coordinate_frame(&mut self, frame: CoordinateFrame) {
        self.flags.set(
            SensorConfigFlags::SENSOR_COORDINATES,
            frame == CoordinateFrame::Sensor,
        );
    }
}

/// Keep-alive command (feature report 8). Write-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeepAlive {
    pub command_id: u16,
    /// Milliseconds.
    pub keep_alive_interval: u16,
}

impl KeepAlive {
    pub fn new(command_id: u16, keep_alive_interval: u16) -> Self {
        Self {
            command_id,
            keep_alive_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistortionType {
    #[default]
    None,
    ScreenOnly,
    Distortion,
    /// Value not assigned by any known firmware.
    Unknown(u8),
}

impl DistortionType {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::ScreenOnly,
            2 => Self::Distortion,
            other => Self::Unknown(other),
        }
    }

    pub fn to_raw(self) -> u8 {
        match self {
            Self::None => 0,
            Self::ScreenOnly => 1,
            Self::Distortion => 2,
            Self::Unknown(raw) => raw,
        }
    }
}

/// Panel and lens geometry (feature report 9). Read-only.
///
/// Lengths are the device's fixed-point values divided by 1 000 000.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub command_id: u16,
    pub distortion_type: DistortionType,
    pub h_resolution: u16,
    pub v_resolution: u16,
    pub h_screen_size: f32,
    pub v_screen_size: f32,
    pub v_center: f32,
    pub lens_separation: f32,
    pub eye_to_screen_distance: [f32; 2],
    pub distortion_k: [f32; 6],
}

/// Hardware revision, which fixes the interrupt report layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackerGeneration {
    Gen1,
    Gen2,
}

impl TrackerGeneration {
    pub fn from_report_id(report_id: u8) -> Option<Self> {
        match report_id {
            interrupt_ids::TRACKER_GEN1 => Some(Self::Gen1),
            interrupt_ids::TRACKER_GEN2 => Some(Self::Gen2),
            _ => None,
        }
    }

    pub fn report_id(self) -> u8 {
        match self {
            Self::Gen1 => interrupt_ids::TRACKER_GEN1,
            Self::Gen2 => interrupt_ids::TRACKER_GEN2,
        }
    }

    /// Sample slots present in every report of this generation.
    pub fn max_samples(self) -> usize {
        match self {
            Self::Gen1 => 3,
            Self::Gen2 => 2,
        }
    }
}

/// Maximum samples carried by any tracker message.
pub const MAX_TRACKER_SAMPLES: usize = 3;

/// One accelerometer + gyroscope reading in raw 21-bit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackerSample {
    pub accel: [i32; 3],
    pub gyro: [i32; 3],
}

/// Decoded interrupt report. Rebuilt for every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSensorMessage {
    pub generation: TrackerGeneration,
    pub last_command_id: u16,
    /// Already clamped to the generation's slot count.
    pub num_samples: u8,
    /// Microseconds.
    pub timestamp: u32,
    pub temperature: i16,
    /// Slots at and past `num_samples` are zeroed.
    pub samples: [TrackerSample; MAX_TRACKER_SAMPLES],
    pub mag: [i16; 3],
}

impl TrackerSensorMessage {
    /// The decoded samples, oldest first.
    pub fn samples(&self) -> &[TrackerSample] {
        self.samples
            .get(..usize::from(self.num_samples))
            .unwrap_or(&self.samples)
    }
}

//! Interface to the downstream sensor-fusion consumer.

use serde::{Deserialize, Serialize};

/// Scale from raw sensor counts to fusion units.
pub const RAW_SCALE: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Scale a 21-bit inertial reading.
    pub fn from_raw(raw: [i32; 3]) -> Self {
        let [x, y, z] = raw.map(|axis| axis as f32 * RAW_SCALE);
        Self { x, y, z }
    }

    /// Scale a 16-bit magnetometer reading.
    pub fn from_raw_mag(raw: [i16; 3]) -> Self {
        let [x, y, z] = raw.map(|axis| f32::from(axis) * RAW_SCALE);
        Self { x, y, z }
    }
}

/// One inertial sample with the time elapsed since the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FusionSample {
    pub accel: Vec3,
    pub gyro: Vec3,
    /// Seconds.
    pub dt: f32,
}

/// Receives decoded sensor data from a [`DeviceSession`](crate::DeviceSession).
///
/// For each tracker report the session calls `on_magnetometer` once and then
/// `on_sample` for every sample, oldest first.
pub trait FusionSink {
    fn on_magnetometer(&mut self, mag: Vec3);

    fn on_sample(&mut self, sample: FusionSample);
}

/// Event captured by [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FusionEvent {
    Magnetometer(Vec3),
    Sample(FusionSample),
}

/// A sink that keeps everything it is given, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<FusionEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[FusionEvent] {
        &self.events
    }

    pub fn samples(&self) -> impl Iterator<Item = &FusionSample> {
        self.events.iter().filter_map(|event| match event {
            FusionEvent::Sample(sample) => Some(sample),
            FusionEvent::Magnetometer(_) => None,
        })
    }

    pub fn magnetometer_readings(&self) -> impl Iterator<Item = &Vec3> {
        self.events.iter().filter_map(|event| match event {
            FusionEvent::Magnetometer(mag) => Some(mag),
            FusionEvent::Sample(_) => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FusionSink for RecordingSink {
    fn on_magnetometer(&mut self, mag: Vec3) {
        self.events.push(FusionEvent::Magnetometer(mag));
    }

    fn on_sample(&mut self, sample: FusionSample) {
        self.events.push(FusionEvent::Sample(sample));
    }
}

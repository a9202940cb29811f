//! Device session: configuration handshake, keep-alive and report handling.
//!
//! The session owns everything it knows about one tracker. The transport and
//! the fusion consumer are borrowed per call, so a single thread can drive
//! the device with a plain polling loop:
//!
//! ```text
//! start ──► synchronize ──► keep-alive ──► Streaming
//!                                           │
//!              poll: keep-alive, read, handle_report ◄──┘
//! ```

use std::time::Instant;

use hid_rift_protocol::{
    CoordinateFrame, DisplayInfo, KeepAlive, SensorConfig, SensorRange, TrackerSensorMessage,
    decode_tracker_report, feature_ids, vendor_commands,
};
use hmd_hid_common::HidTransport;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{KeepAliveCommand, SessionConfig};
use crate::error::{SessionError, SessionResult};
use crate::fusion::{FusionSample, FusionSink, Vec3};
use crate::keep_alive::KeepAliveScheduler;
use crate::timing::TimingIntegrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Synchronizing,
    Streaming,
}

/// Outcome of one configuration write/read-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSync {
    pub requested: CoordinateFrame,
    /// Frame the device reported after the write.
    pub confirmed: CoordinateFrame,
    /// The read-back failed and `confirmed` fell back to [`CoordinateFrame::Hmd`].
    pub read_back_failed: bool,
}

impl FrameSync {
    /// The device did not end up in the requested frame.
    pub fn is_diverged(&self) -> bool {
        self.requested != self.confirmed
    }
}

/// State kept for one tracker.
#[derive(Debug, Clone)]
pub struct DeviceSession {
    config: SessionConfig,
    state: SessionState,
    requested_frame: CoordinateFrame,
    hardware_frame: CoordinateFrame,
    sensor_config: SensorConfig,
    sensor_range: Option<SensorRange>,
    display_info: Option<DisplayInfo>,
    keep_alive: KeepAliveScheduler,
    timing: TimingIntegrator,
    raw_mag: Vec3,
    raw_accel: Vec3,
    raw_gyro: Vec3,
}

impl Default for DeviceSession {
    fn default() -> Self {
        Self::with_config(SessionConfig::default())
    }
}

impl DeviceSession {
    /// Create a session after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfiguration`] if `config` is rejected
    /// by [`SessionConfig::validate`].
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: SessionConfig) -> Self {
        let keep_alive = KeepAliveScheduler::new(
            config.keep_alive_margin(),
            config.fallback_keep_alive_interval_ms,
        );
        Self {
            requested_frame: config.coordinate_frame,
            config,
            state: SessionState::Uninitialized,
            hardware_frame: CoordinateFrame::Hmd,
            sensor_config: SensorConfig::default(),
            sensor_range: None,
            display_info: None,
            keep_alive,
            timing: TimingIntegrator::new(),
            raw_mag: Vec3::ZERO,
            raw_accel: Vec3::ZERO,
            raw_gyro: Vec3::ZERO,
        }
    }

    /// Bring the device to streaming.
    ///
    /// Optionally sends the streaming parameters, reads the device config and
    /// optionally the range and display info, synchronizes the coordinate
    /// frame, then sends the first keep-alive.
    ///
    /// # Errors
    ///
    /// Fails if the initial config read, the config write or the first
    /// keep-alive fails. A failed initial read leaves the session
    /// `Uninitialized`.
    pub fn start(
        &mut self,
        transport: &mut dyn HidTransport,
        now: Instant,
    ) -> SessionResult<FrameSync> {
        let info = transport.device_info();
        info!(
            "Starting tracker session for {} ({:04x}:{:04x})",
            info.display_name(),
            info.vendor_id,
            info.product_id
        );

        if self.config.send_streaming_parameters {
            transport.send_feature_report(&vendor_commands::STREAMING_PARAMETERS)?;
            debug!("Sent streaming parameters");
        }

        let report = transport.get_feature_report(feature_ids::SENSOR_CONFIG)?;
        self.sensor_config = SensorConfig::decode(&report)?;
        self.hardware_frame = self.sensor_config.coordinate_frame();
        self.state = SessionState::Synchronizing;
        self.timing.reset();
        self.keep_alive.reset();
        debug!("Device sensor config: {:?}", self.sensor_config);

        if self.config.query_device_info {
            self.query_device_info(transport);
        }

        let sync = self.synchronize(transport)?;
        self.send_keep_alive(transport, now)?;
        Ok(sync)
    }

    fn query_device_info(&mut self, transport: &mut dyn HidTransport) {
        match transport
            .get_feature_report(feature_ids::RANGE)
            .map_err(SessionError::from)
            .and_then(|report| Ok(SensorRange::decode(&report)?))
        {
            Ok(range) => {
                debug!("Sensor range: {:?}", range);
                self.sensor_range = Some(range);
            }
            Err(e) => warn!("Could not read sensor range: {}", e),
        }

        match transport
            .get_feature_report(feature_ids::DISPLAY_INFO)
            .map_err(SessionError::from)
            .and_then(|report| Ok(DisplayInfo::decode(&report)?))
        {
            Ok(display_info) => {
                debug!("Display info: {:?}", display_info);
                self.display_info = Some(display_info);
            }
            Err(e) => warn!("Could not read display info: {}", e),
        }
    }

    /// Write the desired config and reconcile with what the device reports back.
    ///
    /// One write, one read-back, no retry. A frame that did not stick is
    /// reported through [`FrameSync::is_diverged`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotStarted`] before the device config was
    /// read, and [`SessionError::Transport`] if the write fails. A failed
    /// write leaves the state and the stored config as they were.
    pub fn synchronize(&mut self, transport: &mut dyn HidTransport) -> SessionResult<FrameSync> {
        if self.state == SessionState::Uninitialized {
            return Err(SessionError::NotStarted);
        }
        let previous = self.state;
        self.state = SessionState::Synchronizing;
        let requested = self.requested_frame;

        let mut desired = self.sensor_config;
        desired.set_coordinate_frame(requested);
        if let Some(packet_interval) = self.config.packet_interval {
            desired.packet_interval = packet_interval;
        }
        if let Some(keep_alive_interval) = self.config.keep_alive_interval_ms {
            desired.keep_alive_interval = keep_alive_interval;
        }

        if let Err(e) = transport.send_feature_report(&desired.to_report()) {
            self.state = previous;
            return Err(e.into());
        }
        self.sensor_config = desired;

        let read_back = transport
            .get_feature_report(feature_ids::SENSOR_CONFIG)
            .map_err(SessionError::from)
            .and_then(|report| Ok(SensorConfig::decode(&report)?));

        let read_back_failed = match read_back {
            Ok(actual) => {
                self.sensor_config = actual;
                self.hardware_frame = actual.coordinate_frame();
                false
            }
            Err(e) => {
                warn!("Could not read back sensor config: {}", e);
                self.hardware_frame = CoordinateFrame::Hmd;
                self.sensor_config.set_coordinate_frame(CoordinateFrame::Hmd);
                true
            }
        };

        self.state = SessionState::Streaming;
        let sync = FrameSync {
            requested,
            confirmed: self.hardware_frame,
            read_back_failed,
        };

        if sync.is_diverged() {
            warn!(
                "Coordinate frame did not stick: requested {:?}, device is in {:?}",
                requested, sync.confirmed
            );
        } else {
            info!("Coordinate frame synchronized: {:?}", sync.confirmed);
        }
        Ok(sync)
    }

    /// Request a new coordinate frame and synchronize again.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotStarted`] before `start` succeeded, and
    /// otherwise the errors of [`synchronize`](Self::synchronize).
    pub fn set_coordinate_frame(
        &mut self,
        transport: &mut dyn HidTransport,
        frame: CoordinateFrame,
    ) -> SessionResult<FrameSync> {
        self.requested_frame = frame;
        self.synchronize(transport)
    }

    /// Send a keep-alive if one is due. Returns whether one was sent.
    ///
    /// Active in every state once the device config has been read, so a
    /// failed synchronization does not let the device stop streaming.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] if the send fails; the next call
    /// will try again.
    pub fn service_keep_alive(
        &mut self,
        transport: &mut dyn HidTransport,
        now: Instant,
    ) -> SessionResult<bool> {
        if self.state == SessionState::Uninitialized
            || !self
                .keep_alive
                .is_due(now, self.sensor_config.keep_alive_interval)
        {
            return Ok(false);
        }
        self.send_keep_alive(transport, now)?;
        Ok(true)
    }

    fn send_keep_alive(&mut self, transport: &mut dyn HidTransport, now: Instant) -> SessionResult<()> {
        match self.config.keep_alive_command {
            KeepAliveCommand::VendorPing => {
                transport.send_feature_report(&vendor_commands::PING)?;
            }
            KeepAliveCommand::KeepAliveReport => {
                let interval = self
                    .keep_alive
                    .effective_interval(self.sensor_config.keep_alive_interval);
                let interval_ms = u16::try_from(interval.as_millis()).unwrap_or(u16::MAX);
                transport.send_feature_report(&KeepAlive::new(0, interval_ms).to_report())?;
            }
        }
        self.keep_alive.record_sent(now);
        debug!("Sent keep-alive ({:?})", self.config.keep_alive_command);
        Ok(())
    }

    /// Decode one interrupt report and hand its data to `sink`.
    ///
    /// On success the magnetometer reading goes to `sink` first, then every
    /// sample with its dt. A report that fails to decode changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Protocol`] for unknown tags and malformed
    /// lengths.
    pub fn handle_report(
        &mut self,
        report: &[u8],
        sink: &mut dyn FusionSink,
    ) -> SessionResult<TrackerSensorMessage> {
        let message = decode_tracker_report(report).inspect_err(|e| {
            warn!("Dropping tracker report ({} bytes): {}", report.len(), e);
        })?;

        self.raw_mag = Vec3::from_raw_mag(message.mag);
        sink.on_magnetometer(self.raw_mag);

        let deltas = self.timing.advance(message.timestamp, message.num_samples);
        for (sample, dt) in message.samples().iter().zip(deltas) {
            self.raw_accel = Vec3::from_raw(sample.accel);
            self.raw_gyro = Vec3::from_raw(sample.gyro);
            sink.on_sample(FusionSample {
                accel: self.raw_accel,
                gyro: self.raw_gyro,
                dt,
            });
        }
        Ok(message)
    }

    /// One polling tick: keep-alive, then a single bounded read.
    ///
    /// Returns the decoded message, or `None` if the read timed out.
    ///
    /// # Errors
    ///
    /// Surfaces keep-alive and read failures from the transport, and decode
    /// failures from [`handle_report`](Self::handle_report).
    pub fn poll(
        &mut self,
        transport: &mut dyn HidTransport,
        sink: &mut dyn FusionSink,
        now: Instant,
    ) -> SessionResult<Option<TrackerSensorMessage>> {
        self.service_keep_alive(transport, now)?;

        match transport.read_report(self.config.read_timeout())? {
            Some(report) => self.handle_report(&report, sink).map(Some),
            None => Ok(None),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn requested_frame(&self) -> CoordinateFrame {
        self.requested_frame
    }

    /// Frame the device confirmed at the last synchronization.
    pub fn hardware_frame(&self) -> CoordinateFrame {
        self.hardware_frame
    }

    pub fn sensor_config(&self) -> &SensorConfig {
        &self.sensor_config
    }

    pub fn sensor_range(&self) -> Option<&SensorRange> {
        self.sensor_range.as_ref()
    }

    pub fn display_info(&self) -> Option<&DisplayInfo> {
        self.display_info.as_ref()
    }

    pub fn last_keep_alive(&self) -> Option<Instant> {
        self.keep_alive.last_sent()
    }

    /// Timestamp of the last decoded report, in microseconds.
    pub fn last_timestamp(&self) -> Option<u32> {
        self.timing.last_timestamp()
    }

    pub fn raw_mag(&self) -> Vec3 {
        self.raw_mag
    }

    pub fn raw_accel(&self) -> Vec3 {
        self.raw_accel
    }

    pub fn raw_gyro(&self) -> Vec3 {
        self.raw_gyro
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::RecordingSink;
    use hmd_hid_common::mock::MockTransport;

    fn config_report(flags: u8, keep_alive_ms: u16) -> Vec<u8> {
        let [ka_lo, ka_hi] = keep_alive_ms.to_le_bytes();
        vec![0x02, 0x00, 0x00, flags, 0x01, ka_lo, ka_hi]
    }

    #[test]
    fn test_start_echoing_device_confirms_request() -> SessionResult<()> {
        let mut device = MockTransport::new(0x2833, 0x0021);
        device.set_feature_report(config_report(0x20, 1000));

        let config = SessionConfig {
            coordinate_frame: CoordinateFrame::Sensor,
            query_device_info: false,
            ..SessionConfig::default()
        };
        let mut session = DeviceSession::new(config)?;
        let sync = session.start(&mut device, Instant::now())?;

        assert!(!sync.is_diverged());
        assert_eq!(session.state(), SessionState::Streaming);
        assert_eq!(session.hardware_frame(), CoordinateFrame::Sensor);
        assert!(session.sensor_config().flags.sensor_coordinates());
        assert!(session.last_keep_alive().is_some());
        Ok(())
    }

    #[test]
    fn test_set_coordinate_frame_before_start() {
        let mut device = MockTransport::new(0x2833, 0x0021);
        let mut session = DeviceSession::default();
        let result = session.set_coordinate_frame(&mut device, CoordinateFrame::Sensor);
        assert!(matches!(result, Err(SessionError::NotStarted)));
        assert_eq!(session.requested_frame(), CoordinateFrame::Sensor);
        assert!(device.sent_reports().is_empty());
    }

    #[test]
    fn test_keep_alive_not_sent_before_start() -> SessionResult<()> {
        let mut device = MockTransport::new(0x2833, 0x0021);
        let mut session = DeviceSession::default();
        assert!(!session.service_keep_alive(&mut device, Instant::now())?);
        assert!(device.sent_reports().is_empty());
        Ok(())
    }

    #[test]
    fn test_handle_report_rejects_unknown_tag() {
        let mut session = DeviceSession::default();
        let mut sink = RecordingSink::new();
        let mut report = vec![0u8; 64];
        report[0] = 0x05;

        let result = session.handle_report(&report, &mut sink);
        assert!(matches!(
            result,
            Err(SessionError::Protocol(hid_rift_protocol::RiftError::UnknownReportTag(0x05)))
        ));
        assert!(sink.events().is_empty());
        assert_eq!(session.last_timestamp(), None);
    }
}

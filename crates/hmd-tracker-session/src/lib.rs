//! Device session for Rift-family HMD trackers.
//!
//! Drives a tracker over any [`HidTransport`](hmd_hid_common::HidTransport):
//!
//! - **Configuration sync**: writes the desired sensor config, reads it back
//!   and reports whether the requested coordinate frame stuck ([`FrameSync`])
//! - **Keep-alive**: resends a keep-alive shortly before the device's
//!   interval expires ([`keep_alive`])
//! - **Timing**: turns per-report device timestamps into per-sample time
//!   deltas ([`timing`])
//! - **Fusion hand-off**: scaled samples and magnetometer readings go to a
//!   [`FusionSink`]
//!
//! Everything is single-threaded and synchronous. The only blocking call is
//! the interrupt read in [`DeviceSession::poll`], bounded by the configured
//! timeout.
//!
//! ```no_run
//! use std::time::Instant;
//! use hmd_hid_common::mock::MockTransport;
//! use hmd_tracker_session::{DeviceSession, RecordingSink, SessionConfig};
//!
//! # fn main() -> Result<(), hmd_tracker_session::SessionError> {
//! let mut device = MockTransport::new(0x2833, 0x0021);
//! device.set_feature_report(vec![0x02, 0x00, 0x00, 0x20, 0x01, 0x10, 0x27]);
//!
//! let mut session = DeviceSession::new(SessionConfig::default())?;
//! session.start(&mut device, Instant::now())?;
//!
//! let mut sink = RecordingSink::new();
//! while session.poll(&mut device, &mut sink, Instant::now())?.is_some() {}
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod fusion;
pub mod keep_alive;
pub mod session;
pub mod timing;

pub use config::{KeepAliveCommand, SessionConfig};
pub use error::{SessionError, SessionResult};
pub use fusion::{FusionEvent, FusionSample, FusionSink, RecordingSink, Vec3};
pub use keep_alive::KeepAliveScheduler;
pub use session::{DeviceSession, FrameSync, SessionState};
pub use timing::{SampleDeltas, TICK_SECONDS, TimingIntegrator};

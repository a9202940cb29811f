//! Per-sample time deltas derived from device timestamps.
//!
//! A tracker report carries one timestamp for a batch of up to three samples
//! taken at the nominal 1 kHz rate. The timestamp belongs to the newest
//! sample, so the first sample of the batch absorbs whatever time passed
//! since the previous report beyond the batch's own ticks.

/// Nominal interval between samples, in seconds.
pub const TICK_SECONDS: f32 = 0.001;

const MICROS_PER_SECOND: f32 = 1_000_000.0;

/// Tracks the previous report's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimingIntegrator {
    last_timestamp: Option<u32>,
}

impl TimingIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the most recent report, in microseconds, or `None`
    /// before the first report.
    pub fn last_timestamp(&self) -> Option<u32> {
        self.last_timestamp
    }

    /// Record a report's timestamp and return the dt for each of its samples.
    ///
    /// The first report after construction or [`reset`](Self::reset) has no
    /// reference point and yields the nominal tick. So does a timestamp that
    /// did not move forward (including a counter wrap) and a computed dt that
    /// is not positive.
    pub fn advance(&mut self, timestamp_us: u32, num_samples: u8) -> SampleDeltas {
        let first = match self.last_timestamp {
            Some(last) if timestamp_us > last => {
                let elapsed = (timestamp_us - last) as f32 / MICROS_PER_SECOND;
                let batch = f32::from(num_samples.saturating_sub(1)) * TICK_SECONDS;
                let dt = elapsed - batch;
                if dt > 0.0 { dt } else { TICK_SECONDS }
            }
            _ => TICK_SECONDS,
        };
        self.last_timestamp = Some(timestamp_us);

        SampleDeltas {
            first,
            index: 0,
            count: num_samples,
        }
    }

    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }
}

/// Iterator over the dt of each sample in one report.
#[derive(Debug, Clone)]
pub struct SampleDeltas {
    first: f32,
    index: u8,
    count: u8,
}

impl Iterator for SampleDeltas {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.count {
            return None;
        }
        let dt = if self.index == 0 {
            self.first
        } else {
            TICK_SECONDS
        };
        self.index += 1;
        Some(dt)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::from(self.count - self.index);
        (left, Some(left))
    }
}

impl ExactSizeIterator for SampleDeltas {}

//! Keep-alive scheduling.
//!
//! The device stops streaming when it has not heard from the host for its
//! keep-alive interval. The host resends slightly early, by a fixed margin.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct KeepAliveScheduler {
    last_sent: Option<Instant>,
    margin: Duration,
    fallback_interval_ms: u16,
}

impl KeepAliveScheduler {
    pub fn new(margin: Duration, fallback_interval_ms: u16) -> Self {
        Self {
            last_sent: None,
            margin,
            fallback_interval_ms,
        }
    }

    pub fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }

    /// The interval actually used; a device-reported 0 means "unset".
    pub fn effective_interval(&self, device_interval_ms: u16) -> Duration {
        let ms = if device_interval_ms == 0 {
            self.fallback_interval_ms
        } else {
            device_interval_ms
        };
        Duration::from_millis(u64::from(ms))
    }

    /// `true` when nothing was sent yet or `interval - margin` has elapsed.
    pub fn is_due(&self, now: Instant, device_interval_ms: u16) -> bool {
        let Some(last) = self.last_sent else {
            return true;
        };
        let threshold = self
            .effective_interval(device_interval_ms)
            .saturating_sub(self.margin);
        now.saturating_duration_since(last) >= threshold
    }

    pub fn record_sent(&mut self, now: Instant) {
        self.last_sent = Some(now);
    }

    pub fn reset(&mut self) {
        self.last_sent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> KeepAliveScheduler {
        KeepAliveScheduler::new(Duration::from_millis(200), 10_000)
    }

    #[test]
    fn test_due_before_first_send() {
        assert!(scheduler().is_due(Instant::now(), 1000));
    }

    #[test]
    fn test_due_at_interval_minus_margin() {
        let mut keep_alive = scheduler();
        let start = Instant::now();
        keep_alive.record_sent(start);

        assert!(!keep_alive.is_due(start + Duration::from_millis(799), 1000));
        assert!(keep_alive.is_due(start + Duration::from_millis(800), 1000));
    }

    #[test]
    fn test_zero_interval_uses_fallback() {
        let mut keep_alive = scheduler();
        let start = Instant::now();
        keep_alive.record_sent(start);

        assert_eq!(keep_alive.effective_interval(0), Duration::from_secs(10));
        assert!(!keep_alive.is_due(start + Duration::from_millis(9_799), 0));
        assert!(keep_alive.is_due(start + Duration::from_millis(9_800), 0));
    }

    #[test]
    fn test_clock_going_backwards_is_not_due() {
        let mut keep_alive = scheduler();
        let start = Instant::now();
        keep_alive.record_sent(start + Duration::from_secs(5));
        assert!(!keep_alive.is_due(start, 1000));
    }
}

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Coalesces bursts of input into a single recalculation.
///
/// Every `touch` pushes the deadline back by the full window; the debouncer
/// fires once, when the window has elapsed with no further input. The
/// clock is passed in so callers (and tests) control time.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
    burst: usize,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            burst: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
        self.burst += 1;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Number of inputs coalesced into the pending burst.
    pub fn burst_len(&self) -> usize {
        self.burst
    }

    /// Time left before the pending burst fires, `None` when idle.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns `true` exactly once per burst, when its window has elapsed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.burst = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn idle_debouncer_never_fires() {
        let mut d = Debouncer::default();
        let t0 = Instant::now();
        assert!(!d.is_pending());
        assert!(!d.fire_if_due(t0 + ms(10_000)));
        assert_eq!(d.time_remaining(t0), None);
    }

    #[test]
    fn burst_fires_once_after_last_input() {
        let mut d = Debouncer::new(ms(500));
        let t0 = Instant::now();
        d.touch(t0);
        d.touch(t0 + ms(200));
        d.touch(t0 + ms(400));
        assert_eq!(d.burst_len(), 3);

        // 500ms after the first touch, but only 100ms after the last
        assert!(!d.fire_if_due(t0 + ms(500)));
        assert_eq!(d.time_remaining(t0 + ms(500)), Some(ms(400)));

        assert!(d.fire_if_due(t0 + ms(900)));
        assert!(!d.fire_if_due(t0 + ms(1_000)));
        assert_eq!(d.burst_len(), 0);
    }

    #[test]
    fn overdue_remaining_time_is_zero() {
        let mut d = Debouncer::new(ms(50));
        let t0 = Instant::now();
        d.touch(t0);
        assert_eq!(d.time_remaining(t0 + ms(80)), Some(Duration::ZERO));
    }

    #[test]
    fn cancel_drops_pending_burst() {
        let mut d = Debouncer::new(ms(50));
        let t0 = Instant::now();
        d.touch(t0);
        d.cancel();
        assert!(!d.fire_if_due(t0 + ms(100)));
    }
}

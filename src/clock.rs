//! # Clock source
//! Monotonic time in microseconds, as seen by the controller.

/// A point in time in microseconds since boot
pub type Micros = u64;

/// Microseconds per second
pub const MICROS_PER_SECOND: Micros = 1_000_000;

/// Produces monotonic timestamps. The firmware reads the embassy time driver.
pub trait ClockSource {
    /// Microseconds since an arbitrary, fixed origin. Never decreases.
    fn now_micros(&self) -> Micros;
}

/// Tracks the previous timestamp and hands out the elapsed time between polls
#[derive(Debug, Clone, Copy)]
pub struct ElapsedTracker {
    /// The timestamp of the previous poll
    last: Micros,
}

impl ElapsedTracker {
    /// Create a new `ElapsedTracker` starting at `now`
    #[must_use]
    pub const fn new(now: Micros) -> Self {
        Self { last: now }
    }

    /// Time since the previous call. A timestamp from the past counts as no time passing.
    pub const fn elapsed(&mut self, now: Micros) -> Micros {
        let elapsed = now.saturating_sub(self.last);
        if now > self.last {
            self.last = now;
        }
        elapsed
    }
}

//! # Drift corrected countdown
//! Counts the remaining time down in whole seconds, carrying the sub-second remainder
//! from tick to tick. The oscillator of a cheap board drifts by a few seconds per day,
//! so every `adjust_every_seconds` of counting the remaining time is nudged by
//! `adjust_by_seconds`.

use crate::clock::{MICROS_PER_SECOND, Micros};
use crate::config::TimerSettings;
use crate::duration::TimerDuration;

/// The periodic correction, present only if adjusting is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DriftAdjustment {
    /// Counting time between two corrections
    every: Micros,
    /// Seconds added to the remaining time on each correction, negative subtracts
    by_seconds: i16,
}

/// The countdown state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    /// Remaining whole seconds
    remaining: u64,
    /// Counted time not yet taken off `remaining`, always below one second
    sub_second: Micros,
    /// Counted time since the last correction
    since_adjust: Micros,
    /// Whether the countdown is counting
    running: bool,
    /// The drift correction, if enabled
    adjustment: Option<DriftAdjustment>,
}

impl Countdown {
    /// Create a new paused `Countdown` holding the default duration
    #[must_use]
    pub fn new(settings: &TimerSettings) -> Self {
        let adjustment = settings.adjust_accuracy.then(|| DriftAdjustment {
            // at least one second
            every: u64::from(settings.adjust_every_seconds.max(1)) * MICROS_PER_SECOND,
            by_seconds: settings.adjust_by_seconds,
        });
        Self {
            remaining: settings.default_duration.as_secs(),
            sub_second: 0,
            since_adjust: 0,
            running: false,
            adjustment,
        }
    }

    /// Reinitialize the remaining time and clear the adjustment accounting.
    /// The running state is kept, a zero duration stops the countdown.
    pub const fn reset(&mut self, duration: TimerDuration) {
        self.remaining = duration.as_secs();
        self.sub_second = 0;
        self.since_adjust = 0;
        if self.remaining == 0 {
            self.running = false;
        }
    }

    /// Start counting. Returns false if there is nothing left to count.
    pub const fn start(&mut self) -> bool {
        self.running = self.remaining > 0;
        self.running
    }

    /// Stop counting, keeping the sub-second remainder
    pub const fn pause(&mut self) {
        self.running = false;
    }

    /// Whether the countdown is counting
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the countdown has reached zero
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Remaining whole seconds
    #[must_use]
    pub const fn remaining_secs(&self) -> u64 {
        self.remaining
    }

    /// Remaining time as days, hours, minutes and seconds
    #[must_use]
    pub const fn remaining(&self) -> TimerDuration {
        TimerDuration::from_secs(self.remaining)
    }

    /// Count down by `elapsed` microseconds, applying every correction whose boundary is
    /// crossed on the way. Returns true if this tick made the countdown expire.
    pub fn tick(&mut self, elapsed: Micros) -> bool {
        if !self.running || self.remaining == 0 {
            return false;
        }

        let mut left = elapsed;
        while left > 0 && self.remaining > 0 {
            let step = self
                .adjustment
                .map_or(left, |a| left.min(a.every.saturating_sub(self.since_adjust)));
            left -= step;
            self.count(step);

            if let Some(adjustment) = self.adjustment {
                self.since_adjust += step;
                if self.since_adjust >= adjustment.every {
                    self.since_adjust = 0;
                    // an expired countdown stays expired
                    if self.remaining > 0 {
                        self.correct(adjustment.by_seconds);
                    }
                }
            }
        }

        if self.remaining == 0 {
            self.running = false;
            self.sub_second = 0;
            info!("countdown expired");
            return true;
        }
        false
    }

    /// Take whole seconds off the remaining time
    const fn count(&mut self, micros: Micros) {
        self.sub_second += micros;
        let secs = self.sub_second / MICROS_PER_SECOND;
        self.sub_second %= MICROS_PER_SECOND;
        self.remaining = self.remaining.saturating_sub(secs);
    }

    /// Apply a signed correction, never going below zero
    fn correct(&mut self, by_seconds: i16) {
        let amount = u64::from(by_seconds.unsigned_abs());
        self.remaining = if by_seconds >= 0 {
            self.remaining.saturating_add(amount)
        } else {
            self.remaining.saturating_sub(amount)
        };
        debug!("drift correction {} s, {} s remaining", by_seconds, self.remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(duration_secs: u64, adjust: bool, every: u32, by: i16) -> TimerSettings {
        TimerSettings {
            default_duration: TimerDuration::from_secs(duration_secs),
            adjust_accuracy: adjust,
            adjust_every_seconds: every,
            adjust_by_seconds: by,
            auto_restart: false,
        }
    }

    fn running(settings: &TimerSettings) -> Countdown {
        let mut countdown = Countdown::new(settings);
        countdown.start();
        countdown
    }

    #[test]
    fn test_ticks_summing_to_duration_reach_exactly_zero() {
        for duration in [1_u64, 59, 61, 3_599, 3_601, 90_061] {
            let mut countdown = running(&settings(duration, false, 3600, 1));
            // uneven tick sizes, 1.7 s each, plus the remainder
            let total = duration * MICROS_PER_SECOND;
            let mut elapsed = 0;
            let mut expired = false;
            while elapsed < total {
                let step = (total - elapsed).min(1_700_000);
                assert!(!countdown.is_expired());
                expired = countdown.tick(step);
                elapsed += step;
            }
            assert!(expired, "duration {duration}");
            assert_eq!(countdown.remaining_secs(), 0);
            assert!(countdown.is_expired());
            assert!(!countdown.is_running());
        }
    }

    #[test]
    fn test_sub_second_ticks_carry_over() {
        let mut countdown = running(&settings(10, false, 3600, 1));
        for _ in 0..99 {
            countdown.tick(10_000);
        }
        assert_eq!(countdown.remaining_secs(), 10);
        countdown.tick(10_000);
        assert_eq!(countdown.remaining_secs(), 9);
    }

    #[test]
    fn test_one_correction_per_hour() {
        let duration = 8 * 3600 + 30 * 60;
        let mut adjusted = running(&settings(duration, true, 3600, 1));
        let mut plain = running(&settings(duration, false, 3600, 1));
        for _ in 0..3600 {
            adjusted.tick(MICROS_PER_SECOND);
            plain.tick(MICROS_PER_SECOND);
        }
        assert_eq!(plain.remaining_secs(), duration - 3600);
        assert_eq!(adjusted.remaining_secs(), plain.remaining_secs() + 1);

        // no further correction until the next hour is complete
        adjusted.tick(3599 * MICROS_PER_SECOND);
        assert_eq!(adjusted.remaining_secs(), duration - 3600 + 1 - 3599);
    }

    #[test]
    fn test_negative_correction() {
        let mut countdown = running(&settings(100, true, 10, -2));
        countdown.tick(10 * MICROS_PER_SECOND);
        assert_eq!(countdown.remaining_secs(), 88);
    }

    #[test]
    fn test_large_tick_applies_each_correction() {
        let mut countdown = running(&settings(1_000, true, 10, 1));
        countdown.tick(35 * MICROS_PER_SECOND);
        assert_eq!(countdown.remaining_secs(), 1_000 - 35 + 3);
    }

    #[test]
    fn test_correction_never_goes_negative() {
        let mut countdown = running(&settings(5, true, 3, -10));
        assert!(countdown.tick(3 * MICROS_PER_SECOND));
        assert_eq!(countdown.remaining_secs(), 0);
    }

    #[test]
    fn test_expired_countdown_is_not_resurrected() {
        // expires exactly on the correction boundary
        let mut countdown = running(&settings(10, true, 10, 5));
        assert!(countdown.tick(10 * MICROS_PER_SECOND));
        assert!(countdown.is_expired());
        assert!(!countdown.tick(MICROS_PER_SECOND));
    }

    #[test]
    fn test_zero_adjust_interval_counts_as_one_second() {
        let mut countdown = running(&settings(100, true, 0, 1));
        assert!(!countdown.tick(10 * MICROS_PER_SECOND));
        assert_eq!(countdown.remaining_secs(), 100);

        let mut countdown = running(&settings(100, true, 0, -1));
        countdown.tick(10 * MICROS_PER_SECOND);
        assert_eq!(countdown.remaining_secs(), 80);
    }

    #[test]
    fn test_paused_countdown_ignores_ticks() {
        let mut countdown = Countdown::new(&settings(10, true, 1, 1));
        assert!(!countdown.is_running());
        countdown.tick(5 * MICROS_PER_SECOND);
        assert_eq!(countdown.remaining_secs(), 10);
    }

    #[test]
    fn test_reset_then_is_expired() {
        let mut countdown = running(&settings(10, true, 3600, 1));
        countdown.tick(1_500_000);
        countdown.reset(TimerDuration::from_secs(1));
        assert!(!countdown.is_expired());
        assert!(countdown.is_running());
        // the sub-second remainder was cleared by the reset
        countdown.tick(600_000);
        assert_eq!(countdown.remaining_secs(), 1);

        countdown.reset(TimerDuration::ZERO);
        assert!(countdown.is_expired());
        assert!(!countdown.is_running());
        assert!(!countdown.start());
    }

    #[test]
    fn test_reset_clears_adjustment_accounting() {
        let mut countdown = running(&settings(100, true, 10, 1));
        countdown.tick(9 * MICROS_PER_SECOND);
        countdown.reset(TimerDuration::from_secs(100));
        countdown.tick(9 * MICROS_PER_SECOND);
        assert_eq!(countdown.remaining_secs(), 91);
    }
}

//! # Timer duration
//! A countdown duration split into days, hours, minutes and seconds, and its conversion from
//! and to a plain count of seconds.

use crate::config::ConfigError;
use serde::Deserialize;

/// Seconds per minute
pub const MINUTE: u64 = 60;
/// Seconds per hour
pub const HOUR: u64 = MINUTE * 60;
/// Seconds per day
pub const DAY: u64 = HOUR * 24;

/// A normalized duration. Hours never exceed 23, minutes and seconds never exceed 59.
///
/// Fields missing from the configuration keep the value of [`TimerDuration::FACTORY_DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
#[serde(default = "TimerDuration::factory_default", deny_unknown_fields)]
pub struct TimerDuration {
    /// Days, 0-4294967295
    pub days: u32,
    /// Hours, 0-23
    pub hours: u8,
    /// Minutes, 0-59
    pub minutes: u8,
    /// Seconds, 0-59
    pub seconds: u8,
}

/// A field of the duration that can be edited with the buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum DurationField {
    /// The days
    Days,
    /// The hours
    Hours,
    /// The minutes
    Minutes,
    /// The seconds
    Seconds,
}

impl DurationField {
    /// The field edited after this one, `None` after the seconds
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Days => Some(Self::Hours),
            Self::Hours => Some(Self::Minutes),
            Self::Minutes => Some(Self::Seconds),
            Self::Seconds => None,
        }
    }
}

impl TimerDuration {
    /// A zero duration
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// The countdown duration of a timer fresh from the factory, 8:30:00
    pub const FACTORY_DEFAULT: Self = Self {
        days: 0,
        hours: 8,
        minutes: 30,
        seconds: 0,
    };

    /// [`TimerDuration::FACTORY_DEFAULT`] for serde
    const fn factory_default() -> Self {
        Self::FACTORY_DEFAULT
    }

    /// Create a new `TimerDuration`, rejecting fields beyond their bound
    pub const fn new(days: u32, hours: u8, minutes: u8, seconds: u8) -> Result<Self, ConfigError> {
        let duration = Self {
            days,
            hours,
            minutes,
            seconds,
        };
        match duration.validate() {
            Ok(()) => Ok(duration),
            Err(e) => Err(e),
        }
    }

    /// Check that every field is within its bound
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.hours > 23 {
            return Err(ConfigError::HoursOutOfRange(self.hours));
        }
        if self.minutes > 59 {
            return Err(ConfigError::MinutesOutOfRange(self.minutes));
        }
        if self.seconds > 59 {
            return Err(ConfigError::SecondsOutOfRange(self.seconds));
        }
        Ok(())
    }

    /// Split a count of seconds into a normalized duration. Days saturate at `u32::MAX`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_secs(secs: u64) -> Self {
        let days = secs / DAY;
        Self {
            days: if days > u32::MAX as u64 { u32::MAX } else { days as u32 },
            hours: ((secs % DAY) / HOUR) as u8,
            minutes: ((secs % HOUR) / MINUTE) as u8,
            seconds: (secs % MINUTE) as u8,
        }
    }

    /// The total number of seconds
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.days as u64 * DAY + self.hours as u64 * HOUR + self.minutes as u64 * MINUTE + self.seconds as u64
    }

    /// Increment a single field. Hours, minutes and seconds wrap within their bound, days saturate.
    #[must_use]
    pub const fn increment(self, field: DurationField) -> Self {
        let mut d = self;
        match field {
            DurationField::Days => d.days = d.days.saturating_add(1),
            DurationField::Hours => d.hours = if d.hours >= 23 { 0 } else { d.hours + 1 },
            DurationField::Minutes => d.minutes = if d.minutes >= 59 { 0 } else { d.minutes + 1 },
            DurationField::Seconds => d.seconds = if d.seconds >= 59 { 0 } else { d.seconds + 1 },
        }
        d
    }
}

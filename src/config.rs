//! # Configuration
//! The immutable configuration of the timer, built once at startup and handed to each component.
//!
//! Every setting has a default matching the stock settings of the device. Individual settings can be
//! overridden at build time in `config/timer_config.json`, which `build.rs` embeds into the
//! firmware. The JSON is parsed with `serde-json-core` and validated before the controller
//! is created; out of range values are a [`ConfigError`] and never wrap silently.
use crate::display::{MAX_LINE_LENGTH, MAX_LINES};
use crate::duration::TimerDuration;
use serde::Deserialize;
use thiserror::Error;

/// The configuration overrides embedded by `build.rs`
mod generated {
    include!(concat!(env!("OUT_DIR"), "/timer_config.rs"));
}

/// Microseconds per millisecond
const MICROS_PER_MILLI: u64 = 1_000;

/// Errors detected while building the configuration
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum ConfigError {
    /// The JSON could not be parsed or contains unknown keys
    #[error("configuration is not valid JSON or contains unknown keys")]
    Parse,
    /// Hours must be 0-23
    #[error("hours {0} out of range 0-23")]
    HoursOutOfRange(u8),
    /// Minutes must be 0-59
    #[error("minutes {0} out of range 0-59")]
    MinutesOutOfRange(u8),
    /// Seconds must be 0-59
    #[error("seconds {0} out of range 0-59")]
    SecondsOutOfRange(u8),
    /// The drift adjustment interval must be at least one second
    #[error("adjust_every_seconds must be greater than 0")]
    ZeroAdjustInterval,
    /// The alarm must be executed at least once
    #[error("alarm executions must be greater than 0")]
    ZeroExecutions,
    /// Every alarm execution plays at least one sound
    #[error("alarm sounds_per_execution must be greater than 0")]
    ZeroSounds,
    /// The analog threshold must be a 10 bit reading
    #[error("analog threshold {0} out of range 0-1023")]
    ThresholdOutOfRange(u16),
    /// The LCD line length is not supported
    #[error("lcd line length {0} out of range 1-40")]
    LineLengthOutOfRange(u8),
    /// The LCD line count is not supported
    #[error("lcd line count {0} out of range 1-4")]
    LineCountOutOfRange(u8),
}

/// The complete configuration of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimerConfig {
    /// Countdown settings
    pub timer: TimerSettings,
    /// Alarm settings
    pub alarm: AlarmConfig,
    /// Button settings
    pub input: InputConfig,
    /// Auto backlight settings
    pub backlight: BacklightConfig,
    /// Display geometry
    pub lcd: LcdGeometry,
}

/// Countdown and drift correction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimerSettings {
    /// The duration the countdown starts with and is reset to
    pub default_duration: TimerDuration,
    /// Whether the remaining time is adjusted periodically to counter oscillator drift
    pub adjust_accuracy: bool,
    /// After how many seconds of counting the remaining time is adjusted
    pub adjust_every_seconds: u32,
    /// Seconds added (positive) or subtracted (negative) on every adjustment
    pub adjust_by_seconds: i16,
    /// Whether the countdown restarts after the alarm
    pub auto_restart: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            default_duration: TimerDuration::FACTORY_DEFAULT,
            adjust_accuracy: true,
            adjust_every_seconds: 3600,
            adjust_by_seconds: 1,
            auto_restart: false,
        }
    }
}

/// Alarm pattern settings. Times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlarmConfig {
    /// Whether sounds are played when the alarm is triggered
    pub play_sounds: bool,
    /// Whether the backlight blinks when the alarm is triggered
    pub blink_lcd: bool,
    /// How many times the alarm is executed
    pub executions: u8,
    /// How many sounds are played on every execution
    pub sounds_per_execution: u8,
    /// Tone frequency in Hz
    pub sound_frequency: u16,
    /// How long a single sound is played
    pub sound_length_ms: u16,
    /// Delay between the start of two sounds, should be longer than `sound_length_ms`
    pub sound_delay_ms: u16,
    /// How long the backlight stays on per pulse if sounds are turned off
    pub lcd_delay_ms: u16,
    /// Delay after each execution. Buttons are not registered during an execution.
    pub execution_delay_ms: u16,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            play_sounds: true,
            blink_lcd: true,
            executions: 3,
            sounds_per_execution: 5,
            sound_frequency: 3000,
            sound_length_ms: 100,
            sound_delay_ms: 120,
            lcd_delay_ms: 100,
            execution_delay_ms: 400,
        }
    }
}

impl AlarmConfig {
    /// How long a pulse (tone and/or backlight on) lasts, in microseconds
    #[must_use]
    pub fn pulse_on_micros(&self) -> u64 {
        let ms = if self.play_sounds { self.sound_length_ms } else { self.lcd_delay_ms };
        u64::from(ms) * MICROS_PER_MILLI
    }

    /// The silent gap after a pulse until the next one begins, in microseconds
    #[must_use]
    pub fn pulse_gap_micros(&self) -> u64 {
        (u64::from(self.sound_delay_ms) * MICROS_PER_MILLI).saturating_sub(self.pulse_on_micros())
    }

    /// The delay after every execution, in microseconds
    #[must_use]
    pub fn execution_delay_micros(&self) -> u64 {
        u64::from(self.execution_delay_ms) * MICROS_PER_MILLI
    }
}

/// Which side of the threshold a pressed button reads on. Depends on the button circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Pressed when the reading is at or above the threshold
    Above,
    /// Pressed when the reading is at or below the threshold
    Below,
}

/// Button settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// 0-1023, used to determine whether a button is pressed
    pub analog_threshold: u16,
    /// Direction of the threshold comparison
    pub polarity: Polarity,
    /// Only show detected button presses and input values, for tuning the threshold
    pub debug_mode: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            analog_threshold: 1000,
            polarity: Polarity::Above,
            debug_mode: false,
        }
    }
}

/// Auto backlight settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BacklightConfig {
    /// Whether the backlight turns off after a while without interaction.
    /// If it is off, the first button press only turns it back on.
    pub auto_backlight: bool,
    /// Time without interaction or alarm before the backlight turns off
    pub auto_backlight_delay_micros: u64,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            auto_backlight: true,
            auto_backlight_delay_micros: 10_000 * MICROS_PER_MILLI,
        }
    }
}

/// Character LCD geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LcdGeometry {
    /// Characters per line
    pub line_length: u8,
    /// Number of lines
    pub line_count: u8,
}

impl Default for LcdGeometry {
    fn default() -> Self {
        Self {
            line_length: 16,
            line_count: 2,
        }
    }
}

impl TimerConfig {
    /// The configuration compiled into the firmware, validated
    pub fn compiled() -> Result<Self, ConfigError> {
        Self::from_json(generated::TIMER_CONFIG_JSON)
    }

    /// Parse a JSON object of overrides on top of the defaults, then validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let (config, _) = serde_json_core::from_str::<Self>(json).map_err(|_| {
            error!("timer configuration could not be parsed");
            ConfigError::Parse
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out of range values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timer.default_duration.validate()?;
        if self.timer.adjust_every_seconds == 0 {
            return Err(ConfigError::ZeroAdjustInterval);
        }
        if self.alarm.executions == 0 {
            return Err(ConfigError::ZeroExecutions);
        }
        if self.alarm.sounds_per_execution == 0 {
            return Err(ConfigError::ZeroSounds);
        }
        if self.input.analog_threshold > 1023 {
            return Err(ConfigError::ThresholdOutOfRange(self.input.analog_threshold));
        }
        if self.lcd.line_length == 0 || usize::from(self.lcd.line_length) > MAX_LINE_LENGTH {
            return Err(ConfigError::LineLengthOutOfRange(self.lcd.line_length));
        }
        if self.lcd.line_count == 0 || usize::from(self.lcd.line_count) > MAX_LINES {
            return Err(ConfigError::LineCountOutOfRange(self.lcd.line_count));
        }
        Ok(())
    }
}

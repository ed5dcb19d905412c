//! # Auto backlight
//! Turns the LCD backlight off after a while without interaction and back on with the next
//! button press. That press only wakes the display and is not executed as a command, so a
//! user fumbling for the buttons in the dark cannot change the timer by accident.

use crate::clock::Micros;
use crate::config::BacklightConfig;

/// Backlight state and idle tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklightManager {
    /// Whether the backlight turns off automatically
    auto: bool,
    /// Idle time before the backlight turns off
    delay: Micros,
    /// Whether the backlight is on
    on: bool,
    /// The last button press or alarm notification
    last_interaction: Micros,
    /// When the backlight was last switched
    last_change: Micros,
}

impl BacklightManager {
    /// Create a new `BacklightManager` with the backlight on
    #[must_use]
    pub const fn new(config: &BacklightConfig, now: Micros) -> Self {
        Self {
            auto: config.auto_backlight,
            delay: config.auto_backlight_delay_micros,
            on: true,
            last_interaction: now,
            last_change: now,
        }
    }

    /// Whether the backlight is on
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }

    /// When the backlight was last switched
    #[must_use]
    pub const fn last_change(&self) -> Micros {
        self.last_change
    }

    /// Record a button press. Returns true if the press only woke the backlight and must not
    /// be executed.
    pub fn on_interaction(&mut self, now: Micros) -> bool {
        self.last_interaction = now;
        if self.auto && !self.on {
            self.switch(true, now);
            return true;
        }
        false
    }

    /// Record a notification that should be seen, like the alarm. Turns the backlight on.
    pub fn notify(&mut self, now: Micros) {
        self.last_interaction = now;
        if !self.on {
            self.switch(true, now);
        }
    }

    /// Turn the backlight off once the idle delay has passed. Returns the new state if it
    /// changed.
    pub fn tick(&mut self, now: Micros) -> Option<bool> {
        if self.auto && self.on && now.saturating_sub(self.last_interaction) >= self.delay {
            self.switch(false, now);
            return Some(false);
        }
        None
    }

    /// Switch the backlight
    fn switch(&mut self, on: bool, now: Micros) {
        debug!("backlight {}", on);
        self.on = on;
        self.last_change = now;
    }
}

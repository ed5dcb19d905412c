//! # Button input
//! Both buttons sit on analog inputs. A button counts as pressed when its reading crosses
//! the configured threshold; which side of the threshold means pressed depends on the
//! circuit and is configurable.
//!
//! Presses are edge triggered. A button held down yields a single event, it has to be
//! released before it can trigger again, so there is no auto repeat.

use crate::config::{InputConfig, Polarity};

/// A discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum InputEvent {
    /// Nothing new was pressed
    None,
    /// The left button was pressed
    LeftPress,
    /// The right button was pressed
    RightPress,
    /// Both buttons are down and at least one of them was just pressed
    Both,
}

impl InputEvent {
    /// Whether this is a press
    #[must_use]
    pub const fn is_press(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Turns raw readings into press events
#[derive(Debug, Clone)]
pub struct InputDebouncer {
    /// The pressed threshold, 0-1023
    threshold: u16,
    /// Which side of the threshold is pressed
    polarity: Polarity,
    /// Whether the left button was down at the previous sample
    left_pressed: bool,
    /// Whether the right button was down at the previous sample
    right_pressed: bool,
    /// The readings of the previous sample, for the debug screen
    last_raw: (u16, u16),
}

impl InputDebouncer {
    /// Create a new `InputDebouncer` with both buttons released
    #[must_use]
    pub const fn new(config: &InputConfig) -> Self {
        Self {
            threshold: config.analog_threshold,
            polarity: config.polarity,
            left_pressed: false,
            right_pressed: false,
            last_raw: (0, 0),
        }
    }

    /// Whether a raw reading means pressed
    const fn is_pressed(&self, raw: u16) -> bool {
        match self.polarity {
            Polarity::Above => raw >= self.threshold,
            Polarity::Below => raw <= self.threshold,
        }
    }

    /// Sample both buttons and report a newly pressed button
    pub fn sample(&mut self, raw_left: u16, raw_right: u16) -> InputEvent {
        let left = self.is_pressed(raw_left);
        let right = self.is_pressed(raw_right);
        let left_edge = left && !self.left_pressed;
        let right_edge = right && !self.right_pressed;

        self.left_pressed = left;
        self.right_pressed = right;
        self.last_raw = (raw_left, raw_right);

        let event = match (left_edge, right_edge) {
            (true, true) => InputEvent::Both,
            (true, false) if right => InputEvent::Both,
            (true, false) => InputEvent::LeftPress,
            (false, true) if left => InputEvent::Both,
            (false, true) => InputEvent::RightPress,
            (false, false) => InputEvent::None,
        };
        if event.is_press() {
            debug!("input {} (left {}, right {})", event, raw_left, raw_right);
        }
        event
    }

    /// Whether either button is currently down
    #[must_use]
    pub const fn any_pressed(&self) -> bool {
        self.left_pressed || self.right_pressed
    }

    /// The readings of the previous sample as (left, right)
    #[must_use]
    pub const fn last_raw(&self) -> (u16, u16) {
        self.last_raw
    }
}

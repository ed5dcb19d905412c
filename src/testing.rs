//! Test doubles for the hardware and the clock

use crate::clock::{ClockSource, Micros};
use crate::display::Frame;
use crate::hardware::{Button, HardwareDriver};
use core::cell::Cell;

/// A call made on the hardware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    /// `set_backlight`
    Backlight(bool),
    /// `play_tone`
    PlayTone(u16),
    /// `stop_tone`
    StopTone,
}

/// Records every output call and returns preset button readings
#[derive(Debug, Default)]
pub struct RecordingDriver {
    /// Raw reading of the left button
    pub left: u16,
    /// Raw reading of the right button
    pub right: u16,
    /// Output calls in order
    pub calls: Vec<HwCall>,
    /// Every frame shown
    pub frames: Vec<Frame>,
    /// How often the buttons were read
    pub reads: usize,
}

impl RecordingDriver {
    /// Number of times `call` was made
    pub fn count(&self, call: HwCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    /// The last backlight state set, if any
    pub fn last_backlight(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Backlight(on) => Some(*on),
            _ => None,
        })
    }
}

impl HardwareDriver for RecordingDriver {
    fn read_button(&mut self, button: Button) -> u16 {
        self.reads += 1;
        match button {
            Button::Left => self.left,
            Button::Right => self.right,
        }
    }

    fn set_backlight(&mut self, on: bool) {
        self.calls.push(HwCall::Backlight(on));
    }

    fn play_tone(&mut self, frequency_hz: u16) {
        self.calls.push(HwCall::PlayTone(frequency_hz));
    }

    fn stop_tone(&mut self) {
        self.calls.push(HwCall::StopTone);
    }

    fn show(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// A clock advanced by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    /// Current time
    now: Cell<Micros>,
}

impl ManualClock {
    /// Move the clock forward
    pub fn advance(&self, micros: Micros) -> Micros {
        self.now.set(self.now.get() + micros);
        self.now.get()
    }
}

impl ClockSource for ManualClock {
    fn now_micros(&self) -> Micros {
        self.now.get()
    }
}

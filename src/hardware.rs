//! # Hardware driver interface
//! The controller only talks to the board through this trait. The firmware implements it on
//! top of the RP2040 peripherals, the tests with a recording fake. Pin numbers never
//! appear in the engine.

use crate::display::Frame;

/// The two buttons of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Button {
    /// Left button, selects the field to edit
    Left,
    /// Right button, starts and pauses, increments the edited field
    Right,
}

/// Access to the peripherals of the board
pub trait HardwareDriver {
    /// Read a button as a 10 bit analog value, 0-1023
    fn read_button(&mut self, button: Button) -> u16;

    /// Switch the LCD backlight
    fn set_backlight(&mut self, on: bool);

    /// Start a tone on the piezo. It plays until [`HardwareDriver::stop_tone`].
    fn play_tone(&mut self, frequency_hz: u16);

    /// Silence the piezo
    fn stop_tone(&mut self);

    /// Show a text frame on the display
    fn show(&mut self, frame: &Frame);
}

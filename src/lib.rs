//! # Countdown timer engine
//! Hardware independent core of the countdown timer: a drift corrected countdown, the alarm
//! sequencer, edge triggered analog buttons and the auto backlight, composed by the controller.
//!
//! The firmware binary in `main.rs` drives the controller from an embassy loop on the RP2040.
//! On the host the same code is exercised by the unit tests.
#![cfg_attr(not(test), no_std)]

// must come first, the other modules use its macros
#[macro_use]
mod fmt;

pub mod alarm;
pub mod backlight;
pub mod clock;
pub mod config;
pub mod controller;
pub mod countdown;
pub mod display;
pub mod duration;
pub mod hardware;
pub mod input;
pub mod settings_store;

#[cfg(test)]
mod testing;

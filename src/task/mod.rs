//! Firmware side of the timer: the peripherals and the loop that drives the controller.
pub mod control;
pub mod hardware;
#[macro_use]
pub mod resources;
pub mod settings;

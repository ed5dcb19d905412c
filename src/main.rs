//! # Pico countdown timer
//! Firmware entry point: initializes the RP2040, reads the configuration and the persisted
//! default duration, then hands everything to the control loop.
//!
//! The engine lives in the library and is tested on the host, where this binary is empty.
// the firmware is no_std with its own entry point, the host build only gets an empty main
#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
#[macro_use]
mod task;

#[cfg(target_os = "none")]
use {defmt_rtt as _, panic_probe as _}; // global logger and panic handler

/// Entry point of the firmware
#[cfg(target_os = "none")]
#[embassy_executor::main]
async fn main(_spawner: embassy_executor::Spawner) {
    use crate::task::control::{EmbassyClock, control_loop};
    use crate::task::hardware::PicoHardware;
    use crate::task::resources::{
        AssignedResources, BacklightResources, ButtonResources, FlashResources, PiezoResources, WatchdogResources,
    };
    use crate::task::settings::{load_default_duration, settings_store};
    use defmt::info;
    use embassy_rp::watchdog::Watchdog;
    use pico_countdown_timer::clock::ClockSource;
    use pico_countdown_timer::config::TimerConfig;
    use pico_countdown_timer::controller::Controller;

    info!("Program start");
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    let config = match TimerConfig::compiled() {
        Ok(config) => config,
        Err(e) => defmt::panic!("invalid timer configuration: {}", e),
    };

    let mut store = settings_store(r.flash);
    let default_duration = load_default_duration(&mut store, config.timer.default_duration).await;

    let hardware = PicoHardware::new(r.buttons, r.piezo, r.backlight);
    let controller = Controller::new(config, default_duration, EmbassyClock.now_micros());

    control_loop(controller, hardware, store, Watchdog::new(r.watchdog.watchdog)).await;
}

/// The firmware only runs on the RP2040
#[cfg(not(target_os = "none"))]
fn main() {}

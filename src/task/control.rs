//! # Control loop
//! Runs the controller every 10 ms, persists a changed default duration and feeds the
//! hardware watchdog. If the loop stalls, the watchdog resets the timer.
use crate::task::hardware::PicoHardware;
use crate::task::settings::{FirmwareStore, save_default_duration};
use defmt::info;
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Instant, Ticker};
use pico_countdown_timer::clock::{ClockSource, Micros};
use pico_countdown_timer::controller::Controller;

/// Period of the control loop
const LOOP_PERIOD: Duration = Duration::from_millis(10);
/// Hardware watchdog timeout, long enough for a flash write
const WATCHDOG_TIMEOUT: Duration = Duration::from_millis(2000);

/// The embassy time driver as clock source
pub struct EmbassyClock;

impl ClockSource for EmbassyClock {
    fn now_micros(&self) -> Micros {
        Instant::now().as_micros()
    }
}

/// Run the timer forever
pub async fn control_loop(
    mut controller: Controller,
    mut hardware: PicoHardware,
    mut store: FirmwareStore,
    mut watchdog: Watchdog,
) -> ! {
    info!("control loop started, period {} ms", LOOP_PERIOD.as_millis());
    let clock = EmbassyClock;
    let mut ticker = Ticker::every(LOOP_PERIOD);
    watchdog.start(WATCHDOG_TIMEOUT);

    loop {
        controller.tick(clock.now_micros(), &mut hardware);

        if let Some(duration) = controller.take_pending_save() {
            save_default_duration(&mut store, duration).await;
        }

        watchdog.feed();
        ticker.next().await;
    }
}

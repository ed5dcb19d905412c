//! # Settings
//! The flash backed settings store of the firmware.
//!
//! The default duration is stored in the last 16 KiB of the 2 MiB flash.
use crate::task::resources::FlashResources;
use defmt::{info, warn};
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use pico_countdown_timer::duration::TimerDuration;
use pico_countdown_timer::settings_store::SettingsStore;

/// The size of the flash memory in bytes.
const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// The flash range of the settings, four erase pages
const SETTINGS_RANGE: core::ops::Range<u32> = 0x1F_C000..0x20_0000;

/// The settings store on the on-board flash
pub type FirmwareStore = SettingsStore<Flash<'static, FLASH, Async, FLASH_SIZE>>;

/// Create the settings store
pub fn settings_store(r: FlashResources) -> FirmwareStore {
    SettingsStore::new(Flash::new(r.flash, r.dma_ch), SETTINGS_RANGE)
}

/// The persisted default duration, or `fallback` if there is none or it cannot be read
pub async fn load_default_duration(store: &mut FirmwareStore, fallback: TimerDuration) -> TimerDuration {
    match store.load().await {
        Ok(Some(duration)) => duration,
        Ok(None) => {
            info!("using the configured default duration");
            fallback
        }
        Err(e) => {
            warn!("failed to read the default duration: {}", e);
            fallback
        }
    }
}

/// Persist a new default duration. Failures are logged, the timer keeps running.
pub async fn save_default_duration(store: &mut FirmwareStore, duration: TimerDuration) {
    if let Err(e) = store.store(duration).await {
        warn!("failed to persist the default duration: {}", e);
    }
}

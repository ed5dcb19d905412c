//! # Settings store
//! Persists the default countdown duration in flash, so a duration set with the buttons
//! survives a power cycle.
//!
//! The duration is stored as four key/value pairs (days, hours, minutes, seconds) in a
//! `sequential-storage` map, which spreads the writes over the pages of the flash range.

use crate::duration::TimerDuration;
use core::ops::Range;
use embedded_storage_async::nor_flash::MultiwriteNorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};
use thiserror::Error;

/// Key of the days
const KEY_DAYS: u8 = 0;
/// Key of the hours
const KEY_HOURS: u8 = 1;
/// Key of the minutes
const KEY_MINUTES: u8 = 2;
/// Key of the seconds
const KEY_SECONDS: u8 = 3;

/// Errors of the settings store
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum StoreError {
    /// Reading or writing the flash failed
    #[error("flash access failed")]
    Flash,
    /// The stored values do not form a valid duration
    #[error("stored duration is out of range")]
    Corrupt,
}

/// Reads and writes the default duration
pub struct SettingsStore<F> {
    /// The flash holding the map
    flash: F,
    /// The part of the flash used by the map, page aligned, at least two pages
    flash_range: Range<u32>,
    /// A buffer used for reading and writing items
    data_buffer: [u8; 128],
}

impl<F: MultiwriteNorFlash> SettingsStore<F> {
    /// Create a new `SettingsStore` on `flash_range` of `flash`
    pub const fn new(flash: F, flash_range: Range<u32>) -> Self {
        Self {
            flash,
            flash_range,
            data_buffer: [0; 128],
        }
    }

    /// Read the stored duration. `None` if nothing was ever stored.
    /// Fields missing from a partial write read as zero.
    pub async fn load(&mut self) -> Result<Option<TimerDuration>, StoreError> {
        let days = self.fetch::<u32>(KEY_DAYS).await?;
        let hours = self.fetch::<u8>(KEY_HOURS).await?;
        let minutes = self.fetch::<u8>(KEY_MINUTES).await?;
        let seconds = self.fetch::<u8>(KEY_SECONDS).await?;

        if days.is_none() && hours.is_none() && minutes.is_none() && seconds.is_none() {
            info!("no duration stored in flash");
            return Ok(None);
        }

        let duration = TimerDuration::new(
            days.unwrap_or(0),
            hours.unwrap_or(0),
            minutes.unwrap_or(0),
            seconds.unwrap_or(0),
        )
        .map_err(|_| {
            warn!("stored duration is out of range");
            StoreError::Corrupt
        })?;
        info!("read duration {} s from flash", duration.as_secs());
        Ok(Some(duration))
    }

    /// Write the duration, stopping at the first failing key
    pub async fn store(&mut self, duration: TimerDuration) -> Result<(), StoreError> {
        self.put(KEY_DAYS, &duration.days).await?;
        self.put(KEY_HOURS, &duration.hours).await?;
        self.put(KEY_MINUTES, &duration.minutes).await?;
        self.put(KEY_SECONDS, &duration.seconds).await?;
        info!("stored duration {} s in flash", duration.as_secs());
        Ok(())
    }

    /// Fetch a single value
    async fn fetch<V>(&mut self, key: u8) -> Result<Option<V>, StoreError>
    where
        V: for<'d> sequential_storage::map::Value<'d>,
    {
        fetch_item::<u8, V, _>(
            &mut self.flash,
            self.flash_range.clone(),
            &mut NoCache::new(),
            &mut self.data_buffer,
            &key,
        )
        .await
        .map_err(|_| {
            warn!("failed to fetch value for key {}", key);
            StoreError::Flash
        })
    }

    /// Store a single value
    async fn put<V>(&mut self, key: u8, value: &V) -> Result<(), StoreError>
    where
        V: for<'d> sequential_storage::map::Value<'d>,
    {
        store_item::<u8, V, _>(
            &mut self.flash,
            self.flash_range.clone(),
            &mut NoCache::new(),
            &mut self.data_buffer,
            &key,
            value,
        )
        .await
        .map_err(|_| {
            warn!("failed to store value for key {}", key);
            StoreError::Flash
        })
    }
}

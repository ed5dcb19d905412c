//! # Hardware
//! The RP2040 side of the timer: both buttons on the ADC, the piezo on a PWM slice and the
//! LCD backlight on a GPIO. The display itself is not driven, frames go to the log.
use crate::task::resources::{BacklightResources, ButtonResources, PiezoResources};
use defmt::{info, warn};
use embassy_rp::adc::{self, Adc, Blocking};
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use pico_countdown_timer::display::Frame;
use pico_countdown_timer::hardware::{Button, HardwareDriver};

/// Clock divider of the piezo PWM slice
const PWM_DIVIDER: u8 = 64;
/// Counter frequency of the piezo PWM slice at 125 MHz system clock
const PWM_COUNTER_HZ: u32 = 125_000_000 / PWM_DIVIDER as u32;

/// The peripherals of the timer
pub struct PicoHardware {
    /// The ADC, read blocking from the control loop
    adc: Adc<'static, Blocking>,
    /// Left button channel
    left: adc::Channel<'static>,
    /// Right button channel
    right: adc::Channel<'static>,
    /// Last good readings as (left, right), reused if the ADC fails
    last_readings: (u16, u16),
    /// The piezo
    piezo: Pwm<'static>,
    /// The backlight
    backlight: Output<'static>,
}

impl PicoHardware {
    /// Create a new `PicoHardware` with the piezo silent and the backlight off
    pub fn new(buttons: ButtonResources, piezo: PiezoResources, backlight: BacklightResources) -> Self {
        Self {
            adc: Adc::new_blocking(buttons.adc, adc::Config::default()),
            left: adc::Channel::new_pin(buttons.left_pin, Pull::None),
            right: adc::Channel::new_pin(buttons.right_pin, Pull::None),
            last_readings: (0, 0),
            piezo: Pwm::new_output_a(piezo.pwm_slice, piezo.pin, silent_config()),
            backlight: Output::new(backlight.pin, Level::Low),
        }
    }
}

/// PWM configuration that keeps the output low
fn silent_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = PWM_DIVIDER.into();
    config.compare_a = 0;
    config
}

/// PWM configuration for a square wave of `frequency_hz`
fn tone_config(frequency_hz: u16) -> PwmConfig {
    let period = PWM_COUNTER_HZ / u32::from(frequency_hz.max(1));
    let top = u16::try_from(period.saturating_sub(1)).unwrap_or(u16::MAX);
    let mut config = silent_config();
    config.top = top;
    config.compare_a = top / 2;
    config
}

impl HardwareDriver for PicoHardware {
    fn read_button(&mut self, button: Button) -> u16 {
        let (channel, last) = match button {
            Button::Left => (&mut self.left, &mut self.last_readings.0),
            Button::Right => (&mut self.right, &mut self.last_readings.1),
        };
        match self.adc.blocking_read(channel) {
            // 12 bit reading, the thresholds are 10 bit
            Ok(value) => *last = value >> 2,
            Err(e) => warn!("reading {} button failed: {:?}", button, e),
        }
        *last
    }

    fn set_backlight(&mut self, on: bool) {
        self.backlight.set_level(if on { Level::High } else { Level::Low });
    }

    fn play_tone(&mut self, frequency_hz: u16) {
        self.piezo.set_config(&tone_config(frequency_hz));
    }

    fn stop_tone(&mut self) {
        self.piezo.set_config(&silent_config());
    }

    fn show(&mut self, frame: &Frame) {
        for line in frame.lines() {
            info!("lcd: {}", line.as_str());
        }
    }
}

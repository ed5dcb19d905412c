//! # Resources
//! Groups the RP2040 peripherals by the part of the timer that uses them.
//! This is the only place where pins are assigned. `split_resources!` hands the groups out
//! in `main.rs`.
use assign_resources::assign_resources;
use embassy_rp::{Peri, peripherals};

assign_resources! {
    // left button on ADC1, right button on ADC0
    buttons: ButtonResources {
        adc: ADC,
        left_pin: PIN_27,
        right_pin: PIN_26,
    },
    // PWM slice 5 channel A
    piezo: PiezoResources {
        pwm_slice: PWM_SLICE5,
        pin: PIN_10,
    },
    // LCD pin 15
    backlight: BacklightResources {
        pin: PIN_12,
    },
    // DMA channel for async flash reads
    flash: FlashResources {
        flash: FLASH,
        dma_ch: DMA_CH0,
    },
    watchdog: WatchdogResources {
        watchdog: WATCHDOG,
    },
}

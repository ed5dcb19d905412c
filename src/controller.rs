//! # Controller
//! Composes the countdown, the alarm sequencer, the buttons and the auto backlight.
//! `tick` is called by the control loop with the current timestamp; it is the only place
//! where the state of the timer changes.
//!
//! Buttons:
//! - right: start and pause the countdown, or increment the field being edited
//! - left: edit the duration, moving through days, hours, minutes and seconds; after the
//!   seconds the edited duration becomes the new default
//! - both: reset the countdown to the default duration
//! - any: stop a running alarm

use crate::alarm::{AlarmSequencer, AlarmStatus};
use crate::backlight::BacklightManager;
use crate::clock::{ElapsedTracker, Micros};
use crate::config::TimerConfig;
use crate::countdown::Countdown;
use crate::display::Frame;
use crate::duration::{DurationField, TimerDuration};
use crate::hardware::{Button, HardwareDriver};
use crate::input::{InputDebouncer, InputEvent};

/// How often the debug screen is refreshed at most
const DEBUG_REFRESH_MICROS: Micros = 100_000;

/// The highest 10 bit reading
const MAX_READING: u16 = 1023;

/// What the buttons currently do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Mode {
    /// The countdown is counting
    Running,
    /// The countdown is stopped
    Paused,
    /// A field of the duration is being edited, the countdown is stopped
    Editing(DurationField),
}

/// The timer
pub struct Controller {
    /// The configuration
    config: TimerConfig,
    /// The countdown
    countdown: Countdown,
    /// The alarm
    alarm: AlarmSequencer,
    /// The buttons
    input: InputDebouncer,
    /// The auto backlight
    backlight: BacklightManager,
    /// Time between ticks
    elapsed: ElapsedTracker,
    /// What the buttons do
    mode: Mode,
    /// The duration the countdown is reset to
    default_duration: TimerDuration,
    /// A new default duration that has not been persisted yet
    pending_save: Option<TimerDuration>,
    /// The last detected press, shown on the debug screen
    last_event: InputEvent,
    /// The backlight state last set on the hardware, `None` forces the next update
    applied_backlight: Option<bool>,
    /// The frame last shown
    last_frame: Option<Frame>,
    /// When the debug screen was last refreshed
    last_debug_render: Micros,
}

impl Controller {
    /// Create a new `Controller` counting down from `default_duration`.
    /// In debug mode the countdown stays paused.
    #[must_use]
    pub fn new(config: TimerConfig, default_duration: TimerDuration, now: Micros) -> Self {
        let mut countdown = Countdown::new(&config.timer);
        countdown.reset(default_duration);
        let mode = if !config.input.debug_mode && countdown.start() {
            Mode::Running
        } else {
            Mode::Paused
        };
        info!(
            "timer starts with {} s, mode {}, debug mode {}",
            default_duration.as_secs(),
            mode,
            config.input.debug_mode
        );
        Self {
            countdown,
            alarm: AlarmSequencer::new(config.alarm),
            input: InputDebouncer::new(&config.input),
            backlight: BacklightManager::new(&config.backlight, now),
            elapsed: ElapsedTracker::new(now),
            mode,
            default_duration,
            pending_save: None,
            last_event: InputEvent::None,
            applied_backlight: None,
            last_frame: None,
            last_debug_render: now,
            config,
        }
    }

    /// Run one iteration of the control loop
    pub fn tick(&mut self, now: Micros, hardware: &mut impl HardwareDriver) {
        let elapsed = self.elapsed.elapsed(now);
        if self.countdown.tick(elapsed) {
            self.start_alarm(now, hardware);
        }

        if self.alarm.advance(now, hardware) == AlarmStatus::Completed {
            self.finish_alarm(now, hardware);
        }

        // buttons are not read while an alarm execution is playing
        if !self.alarm.is_busy() {
            let event = self.poll_input(hardware);
            if event.is_press() {
                self.handle_press(event, now, hardware);
            }
        }

        // the sequencer owns the backlight while it blinks
        if !self.alarm.is_firing() {
            self.backlight.tick(now);
            self.sync_backlight(hardware);
        }

        self.render(now, hardware);
    }

    /// Remaining time of the countdown
    #[must_use]
    pub const fn remaining(&self) -> TimerDuration {
        self.countdown.remaining()
    }

    /// What the buttons currently do
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the alarm is running
    #[must_use]
    pub const fn is_alarm_firing(&self) -> bool {
        self.alarm.is_firing()
    }

    /// Completed executions of the running alarm
    #[must_use]
    pub fn alarm_executions_done(&self) -> Option<u8> {
        self.alarm.executions_done()
    }

    /// Whether the backlight is on, as far as the auto backlight is concerned
    #[must_use]
    pub const fn backlight_on(&self) -> bool {
        self.backlight.is_on()
    }

    /// The duration the countdown is reset to
    #[must_use]
    pub const fn default_duration(&self) -> TimerDuration {
        self.default_duration
    }

    /// A new default duration to persist, handed out once
    pub const fn take_pending_save(&mut self) -> Option<TimerDuration> {
        self.pending_save.take()
    }

    /// Read both buttons
    fn poll_input(&mut self, hardware: &mut impl HardwareDriver) -> InputEvent {
        let raw_left = hardware.read_button(Button::Left).min(MAX_READING);
        let raw_right = hardware.read_button(Button::Right).min(MAX_READING);
        let event = self.input.sample(raw_left, raw_right);
        if event.is_press() {
            self.last_event = event;
        }
        event
    }

    /// React to a button press
    fn handle_press(&mut self, event: InputEvent, now: Micros, hardware: &mut impl HardwareDriver) {
        if self.alarm.is_firing() {
            self.alarm.cancel(hardware);
            self.finish_alarm(now, hardware);
            return;
        }
        if self.backlight.on_interaction(now) {
            debug!("press only woke the backlight");
            return;
        }
        if self.config.input.debug_mode {
            return;
        }

        match (event, self.mode) {
            (InputEvent::Both, _) => {
                info!("countdown reset to {} s", self.default_duration.as_secs());
                self.countdown.reset(self.default_duration);
                self.countdown.pause();
                self.mode = Mode::Paused;
            }
            (InputEvent::RightPress, Mode::Running) => {
                self.countdown.pause();
                self.mode = Mode::Paused;
            }
            (InputEvent::RightPress, Mode::Paused) => {
                if self.countdown.is_expired() {
                    self.countdown.reset(self.default_duration);
                }
                if self.countdown.start() {
                    self.mode = Mode::Running;
                }
            }
            (InputEvent::RightPress, Mode::Editing(field)) => {
                let edited = self.countdown.remaining().increment(field);
                self.countdown.reset(edited);
            }
            (InputEvent::LeftPress, Mode::Running | Mode::Paused) => {
                info!("editing the duration");
                self.countdown.pause();
                self.countdown.reset(self.default_duration);
                self.mode = Mode::Editing(DurationField::Days);
            }
            (InputEvent::LeftPress, Mode::Editing(field)) => match field.next() {
                Some(next) => self.mode = Mode::Editing(next),
                None => self.finish_edit(),
            },
            (InputEvent::None, _) => {}
        }
    }

    /// Make the edited duration the new default
    fn finish_edit(&mut self) {
        let edited = self.countdown.remaining();
        if edited != self.default_duration {
            info!("new default duration {} s", edited.as_secs());
            self.default_duration = edited;
            self.pending_save = Some(edited);
        }
        self.mode = Mode::Paused;
    }

    /// The countdown expired
    fn start_alarm(&mut self, now: Micros, hardware: &mut impl HardwareDriver) {
        self.mode = Mode::Paused;
        self.backlight.notify(now);
        if !self.config.alarm.blink_lcd {
            self.sync_backlight(hardware);
        }
        self.alarm.start(now, hardware);
        self.applied_backlight = None;
    }

    /// The alarm completed or was cancelled
    fn finish_alarm(&mut self, now: Micros, hardware: &mut impl HardwareDriver) {
        self.backlight.notify(now);
        self.applied_backlight = None;
        self.sync_backlight(hardware);
        if self.config.timer.auto_restart {
            info!("countdown restarts");
            self.countdown.reset(self.default_duration);
            if self.countdown.start() {
                self.mode = Mode::Running;
            }
        }
    }

    /// Put the backlight state on the hardware if it changed
    fn sync_backlight(&mut self, hardware: &mut impl HardwareDriver) {
        let on = self.backlight.is_on();
        if self.applied_backlight != Some(on) {
            hardware.set_backlight(on);
            self.applied_backlight = Some(on);
        }
    }

    /// Show the current frame if it changed
    fn render(&mut self, now: Micros, hardware: &mut impl HardwareDriver) {
        let geometry = self.config.lcd;
        let frame = if self.config.input.debug_mode {
            if self.last_frame.is_some() && now.saturating_sub(self.last_debug_render) < DEBUG_REFRESH_MICROS {
                return;
            }
            self.last_debug_render = now;
            let (raw_left, raw_right) = self.input.last_raw();
            Frame::debug(raw_left, raw_right, self.last_event, geometry)
        } else {
            Frame::countdown(self.countdown.remaining(), self.mode, self.alarm.is_firing(), geometry)
        };
        if self.last_frame.as_ref() != Some(&frame) {
            hardware.show(&frame);
            self.last_frame = Some(frame);
        }
    }
}

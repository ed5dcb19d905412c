//! # Alarm sequencer
//! Plays the alarm when the countdown expires: `executions` times a burst of
//! `sounds_per_execution` pulses, each pulse a tone and/or a backlight blink, followed by
//! `execution_delay_ms` of silence.
//!
//! The delays are deadlines advanced by the control loop's timestamp, the sequencer never
//! sleeps. An execution (its pulses and the delay after it) is a busy interval: the
//! controller does not read the buttons until the sequencer reports the boundary to the next
//! execution. A button held through an execution therefore stops the alarm at the next
//! boundary.

use crate::clock::Micros;
use crate::config::AlarmConfig;
use crate::hardware::HardwareDriver;

/// The part of an execution the sequencer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
enum Phase {
    /// A tone is playing and/or the backlight is on
    PulseOn,
    /// Silence until the next pulse begins
    PulseGap,
    /// Silence after the last pulse of the execution
    ExecutionDelay,
    /// Between two executions, buttons are read
    Boundary,
}

/// The state of a running alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AlarmRun {
    /// Completed executions
    executions_done: u8,
    /// Completed pulses in the current execution
    pulses_done: u8,
    /// Current phase
    phase: Phase,
    /// When the current phase ends
    deadline: Micros,
}

/// What the sequencer is doing after an [`AlarmSequencer::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum AlarmStatus {
    /// No alarm
    Idle,
    /// Inside an execution, buttons must not be read
    Busy,
    /// An execution completed and more follow, buttons may be read
    Boundary,
    /// The last execution just completed
    Completed,
}

/// Drives the alarm pattern
#[derive(Debug, Clone)]
pub struct AlarmSequencer {
    /// The alarm pattern
    config: AlarmConfig,
    /// The running alarm, `None` when idle
    run: Option<AlarmRun>,
}

impl AlarmSequencer {
    /// Create a new idle `AlarmSequencer`
    #[must_use]
    pub const fn new(config: AlarmConfig) -> Self {
        Self { config, run: None }
    }

    /// Whether an alarm is running
    #[must_use]
    pub const fn is_firing(&self) -> bool {
        self.run.is_some()
    }

    /// Completed executions of the running alarm
    #[must_use]
    pub fn executions_done(&self) -> Option<u8> {
        self.run.map(|run| run.executions_done)
    }

    /// Whether the sequencer is inside an execution
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.run.is_some_and(|run| run.phase != Phase::Boundary)
    }

    /// Start the alarm at `now`. Does nothing and returns false if it is already firing.
    pub fn start(&mut self, now: Micros, hardware: &mut impl HardwareDriver) -> bool {
        if self.run.is_some() {
            return false;
        }
        info!(
            "alarm started, {} executions of {} sounds",
            self.config.executions, self.config.sounds_per_execution
        );
        let mut run = AlarmRun {
            executions_done: 0,
            pulses_done: 0,
            phase: Phase::Boundary,
            deadline: now,
        };
        self.begin_execution(&mut run, now, hardware);
        self.run = Some(run);
        true
    }

    /// Move through every phase whose deadline has passed
    pub fn advance(&mut self, now: Micros, hardware: &mut impl HardwareDriver) -> AlarmStatus {
        let Some(mut run) = self.run else {
            return AlarmStatus::Idle;
        };

        if run.phase == Phase::Boundary {
            self.begin_execution(&mut run, now, hardware);
        }

        let status = loop {
            if now < run.deadline {
                break AlarmStatus::Busy;
            }
            match run.phase {
                Phase::PulseOn => {
                    self.end_pulse(hardware);
                    run.pulses_done += 1;
                    run.phase = Phase::PulseGap;
                    run.deadline += self.config.pulse_gap_micros();
                }
                Phase::PulseGap if run.pulses_done < self.config.sounds_per_execution => {
                    self.begin_pulse(&mut run, hardware);
                }
                Phase::PulseGap => {
                    run.phase = Phase::ExecutionDelay;
                    run.deadline += self.config.execution_delay_micros();
                }
                Phase::ExecutionDelay => {
                    run.executions_done += 1;
                    debug!("alarm execution {} done", run.executions_done);
                    if run.executions_done >= self.config.executions {
                        break AlarmStatus::Completed;
                    }
                    run.phase = Phase::Boundary;
                    break AlarmStatus::Boundary;
                }
                Phase::Boundary => break AlarmStatus::Boundary,
            }
        };

        if status == AlarmStatus::Completed {
            info!("alarm completed");
            self.run = None;
        } else {
            self.run = Some(run);
        }
        status
    }

    /// Abort the running alarm, silencing the piezo. Returns the completed executions.
    pub fn cancel(&mut self, hardware: &mut impl HardwareDriver) -> Option<u8> {
        let run = self.run.take()?;
        if self.config.play_sounds {
            hardware.stop_tone();
        }
        info!("alarm cancelled after {} executions", run.executions_done);
        Some(run.executions_done)
    }

    /// Start the next execution at `now` with its first pulse
    fn begin_execution(&self, run: &mut AlarmRun, now: Micros, hardware: &mut impl HardwareDriver) {
        run.pulses_done = 0;
        run.deadline = now;
        self.begin_pulse(run, hardware);
    }

    /// Start a pulse at the current deadline
    fn begin_pulse(&self, run: &mut AlarmRun, hardware: &mut impl HardwareDriver) {
        if self.config.play_sounds {
            hardware.play_tone(self.config.sound_frequency);
        }
        if self.config.blink_lcd {
            hardware.set_backlight(true);
        }
        run.phase = Phase::PulseOn;
        run.deadline += self.config.pulse_on_micros();
    }

    /// End the current pulse
    fn end_pulse(&self, hardware: &mut impl HardwareDriver) {
        if self.config.play_sounds {
            hardware.stop_tone();
        }
        if self.config.blink_lcd {
            hardware.set_backlight(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HwCall, RecordingDriver};

    /// Length of one execution with the default pattern: 5 x 120 ms + 400 ms
    const EXECUTION: Micros = 1_000_000;

    fn drive_to_end(sequencer: &mut AlarmSequencer, hw: &mut RecordingDriver, step: Micros) -> Vec<AlarmStatus> {
        let mut now = 0;
        let mut seen = Vec::new();
        while sequencer.is_firing() {
            now += step;
            seen.push(sequencer.advance(now, hw));
            assert!(now < 60_000_000, "alarm never completed");
        }
        seen
    }

    #[test]
    fn test_full_sequence_plays_every_sound_once() {
        let config = AlarmConfig::default();
        let mut sequencer = AlarmSequencer::new(config);
        let mut hw = RecordingDriver::default();

        assert!(sequencer.start(0, &mut hw));
        let seen = drive_to_end(&mut sequencer, &mut hw, 1_000);

        assert_eq!(hw.count(HwCall::PlayTone(3000)), 15);
        assert_eq!(hw.count(HwCall::StopTone), 15);
        assert_eq!(hw.count(HwCall::Backlight(true)), 15);
        assert_eq!(hw.count(HwCall::Backlight(false)), 15);
        assert_eq!(seen.iter().filter(|s| **s == AlarmStatus::Boundary).count(), 2);
        assert_eq!(seen.last(), Some(&AlarmStatus::Completed));
        assert_eq!(sequencer.advance(100_000_000, &mut hw), AlarmStatus::Idle);
    }

    #[test]
    fn test_pulse_timing() {
        let mut sequencer = AlarmSequencer::new(AlarmConfig::default());
        let mut hw = RecordingDriver::default();
        sequencer.start(0, &mut hw);
        assert_eq!(hw.calls, vec![HwCall::PlayTone(3000), HwCall::Backlight(true)]);

        hw.calls.clear();
        assert_eq!(sequencer.advance(99_999, &mut hw), AlarmStatus::Busy);
        assert!(hw.calls.is_empty());
        sequencer.advance(100_000, &mut hw);
        assert_eq!(hw.calls, vec![HwCall::StopTone, HwCall::Backlight(false)]);

        hw.calls.clear();
        // the second sound begins 120 ms after the first
        sequencer.advance(119_999, &mut hw);
        assert!(hw.calls.is_empty());
        sequencer.advance(120_000, &mut hw);
        assert_eq!(hw.calls, vec![HwCall::PlayTone(3000), HwCall::Backlight(true)]);
    }

    #[test]
    fn test_execution_is_busy_until_boundary() {
        let mut sequencer = AlarmSequencer::new(AlarmConfig::default());
        let mut hw = RecordingDriver::default();
        sequencer.start(0, &mut hw);
        assert!(sequencer.is_busy());
        assert_eq!(sequencer.advance(EXECUTION - 1, &mut hw), AlarmStatus::Busy);
        assert_eq!(sequencer.advance(EXECUTION, &mut hw), AlarmStatus::Boundary);
        assert!(!sequencer.is_busy());
        assert_eq!(sequencer.executions_done(), Some(1));
        // the next execution starts on the following advance
        assert_eq!(sequencer.advance(EXECUTION + 10_000, &mut hw), AlarmStatus::Busy);
        assert!(sequencer.is_busy());
    }

    #[test]
    fn test_late_poll_catches_up_without_extra_executions() {
        let mut sequencer = AlarmSequencer::new(AlarmConfig::default());
        let mut hw = RecordingDriver::default();
        sequencer.start(0, &mut hw);
        // a single very late poll completes only the current execution
        assert_eq!(sequencer.advance(10 * EXECUTION, &mut hw), AlarmStatus::Boundary);
        assert_eq!(sequencer.executions_done(), Some(1));
        assert_eq!(hw.count(HwCall::PlayTone(3000)), 5);
    }

    #[test]
    fn test_never_exceeds_executions() {
        let config = AlarmConfig {
            executions: 2,
            sounds_per_execution: 1,
            ..AlarmConfig::default()
        };
        let mut sequencer = AlarmSequencer::new(config);
        let mut hw = RecordingDriver::default();
        sequencer.start(0, &mut hw);
        drive_to_end(&mut sequencer, &mut hw, 50_000);
        assert_eq!(hw.count(HwCall::PlayTone(3000)), 2);
    }

    #[test]
    fn test_zero_length_pattern_completes() {
        let config = AlarmConfig {
            sound_length_ms: 0,
            sound_delay_ms: 0,
            lcd_delay_ms: 0,
            execution_delay_ms: 0,
            ..AlarmConfig::default()
        };
        let mut sequencer = AlarmSequencer::new(config);
        let mut hw = RecordingDriver::default();
        sequencer.start(0, &mut hw);
        assert_eq!(sequencer.advance(0, &mut hw), AlarmStatus::Boundary);
        assert_eq!(sequencer.advance(0, &mut hw), AlarmStatus::Boundary);
        assert_eq!(sequencer.advance(0, &mut hw), AlarmStatus::Completed);
        assert_eq!(hw.count(HwCall::PlayTone(3000)), 15);
    }

    #[test]
    fn test_cancel_mid_sequence() {
        let mut sequencer = AlarmSequencer::new(AlarmConfig::default());
        let mut hw = RecordingDriver::default();
        sequencer.start(0, &mut hw);
        sequencer.advance(EXECUTION, &mut hw);
        sequencer.advance(EXECUTION + 50_000, &mut hw);

        let done = sequencer.cancel(&mut hw);
        assert_eq!(done, Some(1));
        assert!(done.unwrap() < AlarmConfig::default().executions);
        assert!(!sequencer.is_firing());
        assert_eq!(hw.calls.last(), Some(&HwCall::StopTone));
        assert_eq!(sequencer.advance(EXECUTION * 5, &mut hw), AlarmStatus::Idle);
        assert_eq!(sequencer.cancel(&mut hw), None);
    }

    #[test]
    fn test_start_while_firing_is_ignored() {
        let mut sequencer = AlarmSequencer::new(AlarmConfig::default());
        let mut hw = RecordingDriver::default();
        assert!(sequencer.start(0, &mut hw));
        assert!(!sequencer.start(10, &mut hw));
        assert_eq!(hw.count(HwCall::PlayTone(3000)), 1);
    }

    #[test]
    fn test_blink_only_uses_lcd_delay() {
        let config = AlarmConfig {
            play_sounds: false,
            lcd_delay_ms: 50,
            ..AlarmConfig::default()
        };
        let mut sequencer = AlarmSequencer::new(config);
        let mut hw = RecordingDriver::default();
        sequencer.start(0, &mut hw);
        sequencer.advance(49_999, &mut hw);
        assert_eq!(hw.calls, vec![HwCall::Backlight(true)]);
        sequencer.advance(50_000, &mut hw);
        assert_eq!(hw.calls, vec![HwCall::Backlight(true), HwCall::Backlight(false)]);
        drive_to_end(&mut sequencer, &mut hw, 10_000);
        assert_eq!(hw.count(HwCall::StopTone), 0);
    }
}

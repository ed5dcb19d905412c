//! # Display frames
//! Formats what the timer shows into text lines for a character LCD. The frame is handed to
//! the hardware driver, which owns the actual display.

use crate::config::LcdGeometry;
use crate::controller::Mode;
use crate::duration::{DurationField, TimerDuration};
use crate::input::InputEvent;
use core::fmt::Write;
use heapless::{String, Vec};

/// The longest supported line
pub const MAX_LINE_LENGTH: usize = 40;
/// The most supported lines
pub const MAX_LINES: usize = 4;

/// A single display line
pub type Line = String<MAX_LINE_LENGTH>;

/// The text shown on the display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// The lines, at most the configured line count
    lines: Vec<Line, MAX_LINES>,
}

impl Frame {
    /// The countdown screen: remaining time on the first line, the mode on the second
    #[must_use]
    pub fn countdown(remaining: TimerDuration, mode: Mode, alarm_firing: bool, geometry: LcdGeometry) -> Self {
        let mut frame = Self::default();
        frame.push_line(
            geometry,
            format_args!(
                "{}d {:02}:{:02}:{:02}",
                remaining.days, remaining.hours, remaining.minutes, remaining.seconds
            ),
        );
        let status = if alarm_firing {
            "ALARM!"
        } else {
            match mode {
                Mode::Running => "RUN",
                Mode::Paused => "PAUSE",
                Mode::Editing(DurationField::Days) => "SET DAYS",
                Mode::Editing(DurationField::Hours) => "SET HRS",
                Mode::Editing(DurationField::Minutes) => "SET MIN",
                Mode::Editing(DurationField::Seconds) => "SET SEC",
            }
        };
        frame.push_line(geometry, format_args!("{status}"));
        frame
    }

    /// The debug screen: raw button readings and the last detected event
    #[must_use]
    pub fn debug(raw_left: u16, raw_right: u16, event: InputEvent, geometry: LcdGeometry) -> Self {
        let mut frame = Self::default();
        frame.push_line(geometry, format_args!("L:{raw_left:4} R:{raw_right:4}"));
        let event = match event {
            InputEvent::None => "-",
            InputEvent::LeftPress => "LEFT",
            InputEvent::RightPress => "RIGHT",
            InputEvent::Both => "BOTH",
        };
        frame.push_line(geometry, format_args!("{event}"));
        frame
    }

    /// The lines of the frame
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// A single line, if present
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|line| line.as_str())
    }

    /// Append a line cut to the line length. Lines past the line count are dropped.
    fn push_line(&mut self, geometry: LcdGeometry, args: core::fmt::Arguments<'_>) {
        if self.lines.len() >= usize::from(geometry.line_count) {
            return;
        }
        let mut buffer: String<64> = String::new();
        // overflowing text is cut anyway
        let _ = buffer.write_fmt(args);
        let mut line = Line::new();
        for c in buffer.chars().take(usize::from(geometry.line_length)) {
            let _ = line.push(c);
        }
        let _ = self.lines.push(line);
    }
}

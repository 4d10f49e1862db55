//! Common types and data structures shared between tasks
//!
//! This module contains the message record carried by the bounded queue,
//! the outputs of the edge detector and press classifier, and the command
//! the classifier hands to the actuator.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::MESSAGE_LEN;
use crate::error::{Error, Result};

/// Fixed-size message record carried by the bounded queue
///
/// The body holds at most [`MESSAGE_LEN`] bytes of text; `len()` is the
/// number of valid bytes. Records are moved into the queue by value, so a
/// producer may rebuild its next message while earlier ones are unread.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Message {
    body: String<MESSAGE_LEN>,
}

impl Message {
    /// Create a message from text, rejecting text longer than the record
    pub fn new(text: &str) -> Result<Self> {
        let mut body = String::new();
        body.push_str(text).map_err(|_| Error::MessageTooLong {
            len: text.len(),
            max: Self::capacity(),
        })?;
        Ok(Self { body })
    }

    /// Create a message from format arguments, e.g. `format_args!("Task {}", 1)`
    pub fn format(args: fmt::Arguments<'_>) -> Result<Self> {
        let mut body = String::new();
        if body.write_fmt(args).is_err() {
            let mut counter = LenCounter(0);
            let _ = counter.write_fmt(args);
            return Err(Error::MessageTooLong {
                len: counter.0,
                max: Self::capacity(),
            });
        }
        Ok(Self { body })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        self.body.as_str()
    }

    /// Number of valid bytes in the body
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub const fn capacity() -> usize {
        MESSAGE_LEN
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Message {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str())
    }
}

struct LenCounter(usize);

impl Write for LenCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

/// Transition reported by the edge detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high
    Rising,
    /// High to low
    Falling,
}

impl Edge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Rising => "Rising",
            Edge::Falling => "Falling",
        }
    }
}

/// Duration band of a completed press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressMode {
    Short,
    Medium,
    Long,
}

/// Reconfiguration sent from the press classifier to the actuator
///
/// Delivered through a single-slot signal: a newer command replaces an
/// unread one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorCommand {
    /// Drive the output low and stop toggling; the actuator suspends
    Disable,
    /// Toggle the output every `period_ms`, resuming the actuator if suspended
    Toggle { period_ms: u32 },
}

impl ActuatorCommand {
    /// Toggle period carried by the command (0 = disabled)
    pub fn toggle_period_ms(&self) -> u32 {
        match self {
            ActuatorCommand::Disable => 0,
            ActuatorCommand::Toggle { period_ms } => *period_ms,
        }
    }

    /// Whether this command wakes a suspended actuator
    pub fn resumes(&self) -> bool {
        self.toggle_period_ms() != 0
    }
}

/// Application version information
pub struct AppVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl AppVersion {
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self { major, minor, patch }
    }

    pub fn as_string(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

/// Current application version
pub const APP_VERSION: AppVersion = AppVersion::new(0, 1, 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_keeps_text_and_length() {
        let msg = Message::new("Periodic Message\n").unwrap();
        assert_eq!(msg.as_str(), "Periodic Message\n");
        assert_eq!(msg.len(), 17);
        assert_eq!(msg.as_bytes().last(), Some(&b'\n'));
    }

    #[test]
    fn message_accepts_exactly_the_record_size() {
        let text = "abcdefghijklmnopqrstuvwxy";
        assert_eq!(text.len(), MESSAGE_LEN);
        assert_eq!(Message::new(text).unwrap().len(), MESSAGE_LEN);
    }

    #[test]
    fn message_rejects_oversized_text() {
        let err = Message::new("this text is definitely too long").unwrap_err();
        assert_eq!(err, Error::MessageTooLong { len: 32, max: MESSAGE_LEN });
    }

    #[test]
    fn formatted_message_embeds_tag() {
        let msg = Message::format(format_args!("{} - Message {}\n", "Task 1", 7)).unwrap();
        assert_eq!(msg.as_str(), "Task 1 - Message 7\n");
    }

    #[test]
    fn formatted_overflow_reports_full_length() {
        let err = Message::format(format_args!("{}{}", "0123456789abcdef", "0123456789")).unwrap_err();
        assert_eq!(err, Error::MessageTooLong { len: 26, max: MESSAGE_LEN });
    }

    #[test]
    fn only_toggle_commands_resume() {
        assert!(!ActuatorCommand::Disable.resumes());
        assert_eq!(ActuatorCommand::Disable.toggle_period_ms(), 0);
        assert!(ActuatorCommand::Toggle { period_ms: 400 }.resumes());
    }
}

//! Error type shared by the coordination primitives and tasks

use core::fmt;

/// Errors surfaced by queue, guard, sink and pin operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A finite (or zero) timeout expired before the operation could complete
    Timeout,
    /// Message text does not fit in a message record
    MessageTooLong { len: usize, max: usize },
    /// Reading or writing a digital pin failed
    Pin,
    /// The byte-stream sink rejected a write
    Sink,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout => f.write_str("timed out"),
            Error::MessageTooLong { len, max } => {
                write!(f, "message of {} bytes exceeds the {} byte limit", len, max)
            }
            Error::Pin => f.write_str("digital pin access failed"),
            Error::Sink => f.write_str("output sink write failed"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

//! Byte-stream output sink
//!
//! The sink performs no locking of its own. Writers that share one sink
//! must hold its [`OutputGuard`](crate::guard::OutputGuard) for the whole
//! burst they want to appear contiguously.

use heapless::Vec;

use crate::error::{Error, Result};
use crate::types::Message;

/// Destination for message text (UART on target, memory in tests)
pub trait ByteSink {
    /// Write `bytes` in full
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    fn put_message(&mut self, message: &Message) -> Result<()> {
        self.put_bytes(message.as_bytes())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).put_bytes(bytes)
    }
}

/// Fixed-capacity capture buffer; fails once full
impl<const N: usize> ByteSink for Vec<u8, N> {
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes).map_err(|_| Error::Sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_appends_messages() {
        let mut sink: Vec<u8, 64> = Vec::new();
        sink.put_message(&Message::new("one\n").unwrap()).unwrap();
        sink.put_bytes(b"two\n").unwrap();
        assert_eq!(&sink[..], b"one\ntwo\n");
    }

    #[test]
    fn full_buffer_reports_sink_error() {
        let mut sink: Vec<u8, 4> = Vec::new();
        assert_eq!(sink.put_bytes(b"12345"), Err(Error::Sink));
    }
}

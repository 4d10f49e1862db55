//! Mutual-exclusion guard for the shared output sink
//!
//! The guard owns the sink, so only the current holder can write to it and
//! releasing happens by dropping (or explicitly [`release`]-ing) the
//! returned handle. A task can never release a guard it does not hold.
//!
//! Wake order is not FIFO and there is no priority inheritance: when the
//! holder releases, whichever waiting task is polled first takes the guard.
//! A high-priority waiter can therefore sit behind a low-priority holder for
//! the holder's whole burst.
//!
//! [`release`]: OutputGuard::release

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::with_timeout;

use crate::channels::Timeout;
use crate::error::{Error, Result};

/// Binary lock around a shared sink `S`
pub struct OutputGuard<M: RawMutex, S> {
    sink: Mutex<M, S>,
}

/// Exclusive access to the sink; the guard is released when this is dropped
pub type SinkHandle<'a, M, S> = MutexGuard<'a, M, S>;

impl<M: RawMutex, S> OutputGuard<M, S> {
    pub const fn new(sink: S) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Take exclusive ownership of the sink, waiting according to `timeout`
    pub async fn acquire(&self, timeout: Timeout) -> Result<SinkHandle<'_, M, S>> {
        let handle = match timeout {
            Timeout::Forever => self.sink.lock().await,
            Timeout::Poll => self.sink.try_lock().map_err(|_| Error::Timeout)?,
            Timeout::After(limit) => with_timeout(limit, self.sink.lock())
                .await
                .map_err(|_| {
                    warn!("guard: acquire timed out after {} ms", limit.as_millis());
                    Error::Timeout
                })?,
        };
        trace!("guard: acquired");
        Ok(handle)
    }

    /// Give the sink back and let one waiting task proceed
    pub fn release(handle: SinkHandle<'_, M, S>) {
        drop(handle);
        trace!("guard: released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ByteSink;
    use core::pin::pin;
    use embassy_futures::{block_on, poll_once};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use heapless::Vec;

    type TestGuard = OutputGuard<NoopRawMutex, Vec<u8, 32>>;

    #[test]
    fn poll_fails_while_held() {
        let guard = TestGuard::new(Vec::new());
        let held = block_on(guard.acquire(Timeout::Forever)).unwrap();

        assert_eq!(
            block_on(guard.acquire(Timeout::Poll)).err(),
            Some(Error::Timeout)
        );

        TestGuard::release(held);
        assert!(block_on(guard.acquire(Timeout::Poll)).is_ok());
    }

    #[test]
    fn bounded_acquire_times_out_while_held() {
        let guard = TestGuard::new(Vec::new());
        let _held = block_on(guard.acquire(Timeout::Poll)).unwrap();
        let attempt = block_on(guard.acquire(Timeout::from_millis(5)));
        assert_eq!(attempt.err(), Some(Error::Timeout));
    }

    #[test]
    fn waiter_proceeds_after_release() {
        let guard = TestGuard::new(Vec::new());
        {
            let mut held = block_on(guard.acquire(Timeout::Forever)).unwrap();
            held.put_bytes(b"first ").unwrap();

            let mut waiter = pin!(guard.acquire(Timeout::Forever));
            assert!(poll_once(waiter.as_mut()).is_pending());

            TestGuard::release(held);
            let mut second = block_on(waiter).unwrap();
            second.put_bytes(b"second").unwrap();
        }

        let sink = block_on(guard.acquire(Timeout::Poll)).unwrap();
        assert_eq!(&sink[..], b"first second");
    }
}

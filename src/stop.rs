//! Cooperative stop signal for task loops
//!
//! Firmware tasks never stop; tests use a [`StopToken`] to move a task
//! into its terminal state at a known point.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

/// Latched stop request observed by exactly one task loop
pub struct StopToken<M: RawMutex> {
    stopped: AtomicBool,
    signal: Signal<M, ()>,
}

impl<M: RawMutex> StopToken<M> {
    pub const fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
            signal: Signal::new(),
        }
    }

    /// Request the owning task to stop at its next suspension point
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.signal.signal(());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Resolve once a stop has been requested
    pub async fn wait(&self) {
        while !self.is_stopped() {
            self.signal.wait().await;
        }
    }
}

impl<M: RawMutex> Default for StopToken<M> {
    fn default() -> Self {
        Self::new()
    }
}

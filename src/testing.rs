//! Host fakes for pins, delays and stop points used by the unit tests

use core::convert::Infallible;
use std::cell::RefCell;
use std::vec::Vec;

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::stop::StopToken;

/// Input pin replaying a fixed sequence of samples, then holding the last one
pub struct ScriptedPin {
    levels: Vec<bool>,
    next: usize,
}

impl ScriptedPin {
    pub fn new(levels: Vec<bool>) -> Self {
        Self { levels, next: 0 }
    }

    /// `low` samples low, `high` samples high, then low forever
    pub fn press(low: usize, high: usize) -> Self {
        let mut levels = std::vec![false; low];
        levels.extend(std::iter::repeat(true).take(high));
        levels.push(false);
        Self::new(levels)
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let level = self
            .levels
            .get(self.next)
            .or(self.levels.last())
            .copied()
            .unwrap_or(false);
        self.next += 1;
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Output pin recording every level written to it
pub struct RecordingPin<'a> {
    writes: &'a RefCell<Vec<PinState>>,
}

impl<'a> RecordingPin<'a> {
    pub fn new(writes: &'a RefCell<Vec<PinState>>) -> Self {
        Self { writes }
    }
}

impl ErrorType for RecordingPin<'_> {
    type Error = Infallible;
}

impl OutputPin for RecordingPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.writes.borrow_mut().push(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.writes.borrow_mut().push(PinState::High);
        Ok(())
    }
}

/// Delay that returns at once, recording the requested milliseconds
///
/// Optionally yields to other joined futures and requests a stop once a
/// given number of delays has been taken.
#[derive(Default)]
pub struct TestDelay<'a> {
    pub delays: Vec<u32>,
    stop: Option<(&'a StopToken<NoopRawMutex>, usize)>,
    yields: bool,
}

impl<'a> TestDelay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yielding(mut self) -> Self {
        self.yields = true;
        self
    }

    pub fn stop_after(mut self, count: usize, stop: &'a StopToken<NoopRawMutex>) -> Self {
        self.stop = Some((stop, count));
        self
    }

    async fn record(&mut self, ms: u32) {
        self.delays.push(ms);
        if let Some((stop, count)) = self.stop {
            if self.delays.len() >= count {
                stop.stop();
            }
        }
        if self.yields {
            yield_now().await;
        }
    }
}

impl DelayNs for TestDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000).await
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms).await
    }
}

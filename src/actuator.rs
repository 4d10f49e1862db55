//! Suspendable LED actuator
//!
//! The actuator owns its output pin and configuration. The press classifier
//! never touches that state directly; it sends an [`ActuatorCommand`]
//! through the single-slot [`ActuatorLink`], and the actuator applies the
//! newest command at the top of its next cycle or when it is woken from
//! suspension.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::channels::ActuatorLink;
use crate::error::{Error, Result};
use crate::stop::StopToken;
use crate::types::ActuatorCommand;

/// Output level and toggle period (0 = disabled)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorSettings {
    pub state: PinState,
    pub toggle_period_ms: u32,
}

impl ActuatorSettings {
    /// Output low, not toggling
    pub const fn disabled() -> Self {
        Self {
            state: PinState::Low,
            toggle_period_ms: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.toggle_period_ms != 0
    }

    pub fn apply(&mut self, command: ActuatorCommand) {
        match command {
            ActuatorCommand::Disable => {
                self.toggle_period_ms = 0;
                self.state = PinState::Low;
            }
            ActuatorCommand::Toggle { period_ms } => {
                self.toggle_period_ms = period_ms;
            }
        }
    }
}

impl Default for ActuatorSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Actuator task body
pub struct Actuator<'a, M: RawMutex, P: OutputPin> {
    pin: P,
    settings: ActuatorSettings,
    link: &'a ActuatorLink<M>,
}

impl<'a, M: RawMutex, P: OutputPin> Actuator<'a, M, P> {
    pub fn new(pin: P, settings: ActuatorSettings, link: &'a ActuatorLink<M>) -> Self {
        Self {
            pin,
            settings,
            link,
        }
    }

    /// One cycle: write the output, then either toggle and sleep one period
    /// or suspend until a command re-enables toggling
    pub async fn step<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        if let Some(command) = self.link.try_take() {
            self.settings.apply(command);
        }

        self.pin
            .set_state(self.settings.state)
            .map_err(|_| Error::Pin)?;

        if self.settings.is_enabled() {
            self.settings.state = !self.settings.state;
            delay.delay_ms(self.settings.toggle_period_ms).await;
        } else {
            debug!("Actuator suspended");
            self.suspend().await;
            debug!("Actuator resumed, period {} ms", self.settings.toggle_period_ms);
        }
        Ok(())
    }

    /// Wait for a resuming command
    ///
    /// A `Disable` received while suspended updates the settings but does
    /// not wake the task. A command sent before the task suspended is kept
    /// by the link and seen here.
    async fn suspend(&mut self) {
        loop {
            let command = self.link.wait().await;
            self.settings.apply(command);
            if command.resumes() {
                return;
            }
        }
    }

    pub async fn run<D: DelayNs, C: RawMutex>(
        &mut self,
        delay: &mut D,
        stop: &StopToken<C>,
    ) -> Result<()> {
        info!("Actuator task started");
        while !stop.is_stopped() {
            if let Either::Second(result) = select(stop.wait(), self.step(delay)).await {
                result?;
            }
        }
        info!("Actuator task stopped");
        Ok(())
    }

    pub fn settings(&self) -> ActuatorSettings {
        self.settings
    }
}

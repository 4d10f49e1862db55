//! Button polling, edge detection and press classification
//!
//! This module samples digital inputs on a fixed period, turns the samples
//! into rising/falling edges, and classifies completed presses into duration
//! bands that reconfigure the LED actuator.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::{InputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::channels::{ActuatorLink, MessageQueue, Timeout};
use crate::config::{ClassifierConfig, EdgeReporterConfig};
use crate::error::{Error, Result};
use crate::stop::StopToken;
use crate::types::{ActuatorCommand, Edge, Message, PressMode};

/// Read a pin as a logical level
pub fn read_level<P: InputPin>(pin: &mut P) -> Result<PinState> {
    pin.is_high().map(PinState::from).map_err(|_| Error::Pin)
}

// ===================================================================
// Sample Debouncing
// ===================================================================

/// Accepts a level change only after `required` consecutive samples agree
///
/// With `required == 0` every raw sample passes straight through.
#[derive(Debug, Clone, Copy)]
pub struct SampleDebouncer {
    stable: PinState,
    candidate: PinState,
    count: u8,
    required: u8,
}

impl SampleDebouncer {
    pub fn new(initial: PinState, required: u8) -> Self {
        Self {
            stable: initial,
            candidate: initial,
            count: 0,
            required,
        }
    }

    /// Feed one raw sample and return the debounced level
    pub fn update(&mut self, raw: PinState) -> PinState {
        if self.required == 0 || raw == self.stable {
            self.stable = raw;
            self.candidate = raw;
            self.count = 0;
            return self.stable;
        }

        if raw == self.candidate {
            self.count = self.count.saturating_add(1);
        } else {
            self.candidate = raw;
            self.count = 1;
        }

        if self.count >= self.required {
            self.stable = raw;
            self.count = 0;
        }
        self.stable
    }

    pub fn level(&self) -> PinState {
        self.stable
    }
}

// ===================================================================
// Edge Detection
// ===================================================================

/// Digital input poller state: the previous (debounced) sample
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    previous: PinState,
    debouncer: SampleDebouncer,
}

impl EdgeDetector {
    pub fn new(initial: PinState, debounce_samples: u8) -> Self {
        Self {
            previous: initial,
            debouncer: SampleDebouncer::new(initial, debounce_samples),
        }
    }

    /// Feed one sample; returns the transition it completes, if any
    pub fn update(&mut self, raw: PinState) -> Option<Edge> {
        let current = self.debouncer.update(raw);
        let edge = match (self.previous, current) {
            (PinState::Low, PinState::High) => Some(Edge::Rising),
            (PinState::High, PinState::Low) => Some(Edge::Falling),
            _ => None,
        };
        self.previous = current;
        edge
    }

    /// Level seen by the most recent sample
    pub fn level(&self) -> PinState {
        self.previous
    }
}

// ===================================================================
// Press Classification
// ===================================================================

impl ClassifierConfig {
    /// Duration band of a completed press
    pub fn classify(&self, duration_ms: u32) -> PressMode {
        if duration_ms >= self.long_threshold_ms {
            PressMode::Long
        } else if duration_ms >= self.medium_threshold_ms {
            PressMode::Medium
        } else {
            PressMode::Short
        }
    }

    /// Actuator reconfiguration for a press band
    pub fn command_for(&self, mode: PressMode) -> ActuatorCommand {
        match mode {
            PressMode::Short => ActuatorCommand::Disable,
            PressMode::Medium => ActuatorCommand::Toggle {
                period_ms: self.medium_toggle_ms,
            },
            PressMode::Long => ActuatorCommand::Toggle {
                period_ms: self.long_toggle_ms,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressState {
    Released,
    Pressed,
}

/// Press duration state machine
///
/// Every high sample adds one poll period to the running duration. The
/// decision is produced only on the sample that completes a release; the
/// duration then resets whatever the band.
#[derive(Debug, Clone, Copy)]
pub struct PressClassifier {
    config: ClassifierConfig,
    state: PressState,
    duration_ms: u32,
    detector: EdgeDetector,
}

impl PressClassifier {
    pub fn new(config: ClassifierConfig, initial: PinState) -> Self {
        let state = match initial {
            PinState::High => PressState::Pressed,
            PinState::Low => PressState::Released,
        };
        Self {
            config,
            state,
            duration_ms: 0,
            detector: EdgeDetector::new(initial, config.debounce_samples),
        }
    }

    /// Feed one poll sample; returns the press band when a press ends
    pub fn sample(&mut self, raw: PinState) -> Option<PressMode> {
        let edge = self.detector.update(raw);

        if self.detector.level() == PinState::High {
            if edge == Some(Edge::Rising) {
                self.state = PressState::Pressed;
                self.duration_ms = 0;
            }
            self.duration_ms = self.duration_ms.saturating_add(self.config.poll_period_ms);
            return None;
        }

        let decision = match (self.state, edge) {
            (PressState::Pressed, Some(Edge::Falling)) => {
                let mode = self.config.classify(self.duration_ms);
                debug!("press released after {} ms: {}", self.duration_ms, mode);
                Some(mode)
            }
            _ => None,
        };
        self.state = PressState::Released;
        self.duration_ms = 0;
        decision
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    /// Duration accumulated by the current press
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

// ===================================================================
// Button Tasks
// ===================================================================

/// Press classifier task body: polls a button and reconfigures the actuator
pub struct PressMonitor<'a, M: RawMutex, P: InputPin> {
    pin: P,
    classifier: PressClassifier,
    link: &'a ActuatorLink<M>,
}

impl<'a, M: RawMutex, P: InputPin> PressMonitor<'a, M, P> {
    /// Take the pin and its current level as the starting state
    pub fn new(mut pin: P, config: ClassifierConfig, link: &'a ActuatorLink<M>) -> Result<Self> {
        let initial = read_level(&mut pin)?;
        Ok(Self {
            pin,
            classifier: PressClassifier::new(config, initial),
            link,
        })
    }

    /// One poll period: sample, maybe signal the actuator, then sleep
    pub async fn step<D: DelayNs>(&mut self, delay: &mut D) -> Result<Option<PressMode>> {
        let level = read_level(&mut self.pin)?;
        let decision = self.classifier.sample(level);

        if let Some(mode) = decision {
            let command = self.classifier.config().command_for(mode);
            info!("press classified as {}, actuator -> {}", mode, command);
            self.link.signal(command);
        }

        delay.delay_ms(self.classifier.config().poll_period_ms).await;
        Ok(decision)
    }

    /// Poll until `stop` is requested
    pub async fn run<D: DelayNs, C: RawMutex>(
        &mut self,
        delay: &mut D,
        stop: &StopToken<C>,
    ) -> Result<()> {
        info!("Press monitor started");
        while !stop.is_stopped() {
            if let Either::Second(result) = select(stop.wait(), self.step(delay)).await {
                result?;
            }
        }
        info!("Press monitor stopped");
        Ok(())
    }
}

/// Edge reporter task body: polls a button and queues a message per edge
pub struct EdgeReporter<'a, M: RawMutex, P: InputPin> {
    config: EdgeReporterConfig,
    pin: P,
    detector: EdgeDetector,
    queue: &'a MessageQueue<M>,
}

impl<'a, M: RawMutex, P: InputPin> EdgeReporter<'a, M, P> {
    pub fn new(mut pin: P, config: EdgeReporterConfig, queue: &'a MessageQueue<M>) -> Result<Self> {
        let initial = read_level(&mut pin)?;
        Ok(Self {
            config,
            pin,
            detector: EdgeDetector::new(initial, config.debounce_samples),
            queue,
        })
    }

    /// One poll period: sample, queue a message on an edge, then sleep
    pub async fn step<D: DelayNs>(&mut self, delay: &mut D) -> Result<Option<Edge>> {
        let level = read_level(&mut self.pin)?;
        let edge = self.detector.update(level);

        if let Some(edge) = edge {
            let message =
                Message::format(format_args!("{} {} Edge\n", self.config.label, edge.as_str()))?;
            debug!("{}: {} edge", self.config.label, edge);
            self.queue.send(message, Timeout::Forever).await?;
        }

        delay.delay_ms(self.config.poll_period_ms).await;
        Ok(edge)
    }

    pub async fn run<D: DelayNs, C: RawMutex>(
        &mut self,
        delay: &mut D,
        stop: &StopToken<C>,
    ) -> Result<()> {
        info!("Edge reporter {} started", self.config.label);
        while !stop.is_stopped() {
            if let Either::Second(result) = select(stop.wait(), self.step(delay)).await {
                result?;
            }
        }
        info!("Edge reporter {} stopped", self.config.label);
        Ok(())
    }
}

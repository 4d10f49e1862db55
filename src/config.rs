//! Compile-time configuration for the rtcoord demos
//!
//! Pin assignments, timing constants and the owned configuration structs
//! handed to each task when it is spawned. All periods are in milliseconds
//! (one scheduler tick).

// ===================================================================
// Message Queue Configuration
// ===================================================================

pub const MESSAGE_LEN: usize = 25; // Max characters in a message body
pub const MESSAGE_QUEUE_LEN: usize = 10; // Queue capacity in records

// ===================================================================
// Serial Output
// ===================================================================

pub const UART_BAUD_RATE: u32 = 115_200;

// ===================================================================
// GPIO Pin Assignments - Raspberry Pi Pico
// ===================================================================

pub const UART_TX_PIN: u8 = 0; // UART0 TX
pub const BUTTON1_PIN: u8 = 2; // Edge reporter 1 / press classifier input
pub const BUTTON2_PIN: u8 = 3; // Edge reporter 2
pub const LED_PIN: u8 = 25; // Built-in LED on Pico, driven by the actuator

// ===================================================================
// Timing
// ===================================================================

pub const EDGE_POLL_PERIOD_MS: u32 = 1; // Edge reporters sample every tick
pub const PRESS_POLL_PERIOD_MS: u32 = 10; // Press classifier sample period
pub const PERIODIC_MESSAGE_PERIOD_MS: u32 = 100;
pub const CONSUMER_PERIOD_MS: u32 = 50;

pub const BURST_LEN: u8 = 10; // Messages per guarded burst
pub const BURST_GAP_MS: u32 = 1; // Delay between releasing and re-acquiring the guard
pub const TASK1_MESSAGE_DELAY_MS: u32 = 100;
pub const TASK2_MESSAGE_DELAY_MS: u32 = 500;
pub const HEAVY_LOAD_ITERATIONS: u32 = 100_000;

// ===================================================================
// Press Classification
// ===================================================================

pub const MEDIUM_PRESS_MS: u32 = 2000; // [0, 2000) is a short press
pub const LONG_PRESS_MS: u32 = 4000; // [2000, 4000) medium, [4000, ..) long
pub const MEDIUM_TOGGLE_MS: u32 = 400;
pub const LONG_TOGGLE_MS: u32 = 100;
pub const DEBOUNCE_SAMPLES: u8 = 0; // Stable samples required before an edge counts

// ===================================================================
// Supervisor
// ===================================================================

pub const SUPERVISOR_TICK_SECS: u64 = 10;
pub const STATUS_REPORT_SECS: u32 = 60;

// ===================================================================
// Task Configuration
// ===================================================================

/// Press classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClassifierConfig {
    /// Sample period, also the amount added to the press duration per high sample
    pub poll_period_ms: u32,
    /// Presses at least this long are MEDIUM
    pub medium_threshold_ms: u32,
    /// Presses at least this long are LONG
    pub long_threshold_ms: u32,
    /// Toggle period applied for a MEDIUM press
    pub medium_toggle_ms: u32,
    /// Toggle period applied for a LONG press
    pub long_toggle_ms: u32,
    /// Consecutive equal samples required before a level change is accepted
    pub debounce_samples: u8,
}

impl ClassifierConfig {
    pub const fn new() -> Self {
        Self {
            poll_period_ms: PRESS_POLL_PERIOD_MS,
            medium_threshold_ms: MEDIUM_PRESS_MS,
            long_threshold_ms: LONG_PRESS_MS,
            medium_toggle_ms: MEDIUM_TOGGLE_MS,
            long_toggle_ms: LONG_TOGGLE_MS,
            debounce_samples: DEBOUNCE_SAMPLES,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Guarded periodic emitter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmitterConfig {
    /// Message prefix, e.g. "Task 1"
    pub label: &'static str,
    /// Messages per burst (K)
    pub burst_len: u8,
    /// Delay after each message while the guard is held
    pub message_delay_ms: u32,
    /// Delay after releasing the guard
    pub burst_gap_ms: u32,
    /// Busy-loop iterations run after each message (0 = none)
    pub workload_iterations: u32,
}

impl EmitterConfig {
    pub const fn new(label: &'static str, message_delay_ms: u32) -> Self {
        Self {
            label,
            burst_len: BURST_LEN,
            message_delay_ms,
            burst_gap_ms: BURST_GAP_MS,
            workload_iterations: 0,
        }
    }

    pub const fn with_workload(mut self, iterations: u32) -> Self {
        self.workload_iterations = iterations;
        self
    }

    pub const fn with_burst_len(mut self, burst_len: u8) -> Self {
        self.burst_len = burst_len;
        self
    }
}

/// Edge reporter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeReporterConfig {
    /// Message prefix, e.g. "Button1"
    pub label: &'static str,
    pub poll_period_ms: u32,
    pub debounce_samples: u8,
}

impl EdgeReporterConfig {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            poll_period_ms: EDGE_POLL_PERIOD_MS,
            debounce_samples: DEBOUNCE_SAMPLES,
        }
    }
}

/// Periodic queue producer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProducerConfig {
    pub text: &'static str,
    pub period_ms: u32,
}

impl ProducerConfig {
    pub const fn new() -> Self {
        Self {
            text: "Periodic Message\n",
            period_ms: PERIODIC_MESSAGE_PERIOD_MS,
        }
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue consumer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerConfig {
    /// Delay after each message written to the sink
    pub period_ms: u32,
}

impl ConsumerConfig {
    pub const fn new() -> Self {
        Self {
            period_ms: CONSUMER_PERIOD_MS,
        }
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self::new()
    }
}

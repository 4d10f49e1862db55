//! rtcoord - task coordination primitives and demos for RP2040
//!
//! A small set of coordination pieces for cooperative async tasks, used by
//! three firmware demos on the Raspberry Pi Pico.
//!
//! ## Primitives
//! - **Bounded queue**: fixed-capacity FIFO of 25-byte message records
//! - **Output guard**: mutex around a byte sink so bursts stay contiguous
//! - **Actuator link**: single-slot latest-value command signal
//! - **Stop token**: cooperative cancellation for task loops
//!
//! ## Tasks
//! - Edge reporters and press classifier polling buttons
//! - Suspendable LED actuator
//! - Guarded periodic emitters, periodic producer and queue consumer
//!
//! Task bodies are generic over `embedded-hal` pins and delays, so the same
//! code runs under the host test harness and on target. The `rp2040`
//! feature adds the Embassy HAL bindings in [`hardware`].

#![cfg_attr(not(test), no_std)]

// Must stay first so the logging macros are visible to every module
mod fmt;

pub mod actuator;
pub mod buttons;
pub mod channels;
pub mod config;
pub mod demo;
pub mod emitter;
pub mod error;
pub mod guard;
pub mod sink;
pub mod stop;
pub mod supervisor;
pub mod types;

#[cfg(feature = "rp2040")]
pub mod hardware;

#[cfg(test)]
mod testing;

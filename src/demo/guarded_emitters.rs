//! Guarded emitters demo
//!
//! Two tasks print bursts of ten numbered messages to the same UART. The
//! faster task runs at the higher priority; the slower one adds a busy loop
//! after every message. The output guard keeps each burst contiguous.

use super::{DemoConfig, TaskSpec};
use crate::config::{EmitterConfig, HEAVY_LOAD_ITERATIONS, TASK1_MESSAGE_DELAY_MS, TASK2_MESSAGE_DELAY_MS};

pub const TASK1: EmitterConfig = EmitterConfig::new("Task 1", TASK1_MESSAGE_DELAY_MS);

pub const TASK2: EmitterConfig =
    EmitterConfig::new("Task 2", TASK2_MESSAGE_DELAY_MS).with_workload(HEAVY_LOAD_ITERATIONS);

const TASKS: [TaskSpec; 2] = [
    TaskSpec::new("Task1 with period 100", 50, 2),
    TaskSpec::new("Task2 with period 500", 50, 1),
];

pub struct GuardedEmittersDemo;

impl DemoConfig for GuardedEmittersDemo {
    fn demo_name(&self) -> &'static str {
        "guarded_emitters"
    }

    fn description(&self) -> &'static str {
        "Two periodic emitters share one UART through a mutex"
    }

    fn tasks(&self) -> &'static [TaskSpec] {
        &TASKS
    }
}

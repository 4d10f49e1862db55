//! LED toggle demo
//!
//! A press classifier polls one button every 10 ms. Short presses switch
//! the LED off and suspend the actuator; medium and long presses resume it
//! blinking every 400 ms or 100 ms.

use super::{DemoConfig, TaskSpec};
use crate::actuator::ActuatorSettings;
use crate::config::ClassifierConfig;

/// LED starts low with toggling disabled
pub const INITIAL_LED: ActuatorSettings = ActuatorSettings::disabled();

pub const CLASSIFIER: ClassifierConfig = ClassifierConfig::new();

const TASKS: [TaskSpec; 2] = [
    TaskSpec::new("LED Task", 50, 1),
    TaskSpec::new("Button Task", 50, 1),
];

pub struct LedToggleDemo;

impl DemoConfig for LedToggleDemo {
    fn demo_name(&self) -> &'static str {
        "led_toggle"
    }

    fn description(&self) -> &'static str {
        "Press duration selects LED blink rate"
    }

    fn tasks(&self) -> &'static [TaskSpec] {
        &TASKS
    }
}

//! Message queue demo
//!
//! Two edge reporters and a periodic producer feed the bounded queue; a
//! single consumer drains it to the UART every 50 ms.

use super::{DemoConfig, TaskSpec};
use crate::config::{ConsumerConfig, EdgeReporterConfig, ProducerConfig};

pub const BUTTON1: EdgeReporterConfig = EdgeReporterConfig::new("Button1");
pub const BUTTON2: EdgeReporterConfig = EdgeReporterConfig::new("Button2");
pub const PRODUCER: ProducerConfig = ProducerConfig::new();
pub const CONSUMER: ConsumerConfig = ConsumerConfig::new();

const TASKS: [TaskSpec; 4] = [
    TaskSpec::new("Button1 Task", 100, 1),
    TaskSpec::new("Button2 Task", 100, 1),
    TaskSpec::new("String Task", 100, 1),
    TaskSpec::new("Consumer Task", 100, 1),
];

pub struct MessageQueueDemo;

impl DemoConfig for MessageQueueDemo {
    fn demo_name(&self) -> &'static str {
        "message_queue"
    }

    fn description(&self) -> &'static str {
        "Edge and periodic producers feed one queue consumer"
    }

    fn tasks(&self) -> &'static [TaskSpec] {
        &TASKS
    }
}

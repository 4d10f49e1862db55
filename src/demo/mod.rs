//! Demo catalogue
//!
//! Each firmware binary runs one demo with a fixed task topology
//! established at startup. This module describes those topologies and the
//! owned configuration handed to every task.

pub mod guarded_emitters;
pub mod led_toggle;
pub mod message_queue;

/// Scheduling description of one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskSpec {
    /// Task name shown in logs
    pub name: &'static str,
    /// Stack budget in words (informational; Embassy tasks are statically sized)
    pub stack_words: u16,
    /// Scheduler priority, higher runs first
    pub priority: u8,
}

impl TaskSpec {
    pub const fn new(name: &'static str, stack_words: u16, priority: u8) -> Self {
        Self {
            name,
            stack_words,
            priority,
        }
    }
}

/// Complete demo configuration trait
pub trait DemoConfig {
    /// Demo name for identification
    fn demo_name(&self) -> &'static str;

    /// One-line summary for the startup banner
    fn description(&self) -> &'static str;

    /// Tasks spawned at startup
    fn tasks(&self) -> &'static [TaskSpec];

    fn task_count(&self) -> usize {
        self.tasks().len()
    }

    /// Highest priority used by any task
    fn max_priority(&self) -> u8 {
        self.tasks().iter().map(|t| t.priority).max().unwrap_or(0)
    }

    /// Whether tasks run at different priorities, which requires a
    /// preempting (interrupt) executor next to the thread-mode one
    fn needs_preemption(&self) -> bool {
        let min = self.tasks().iter().map(|t| t.priority).min().unwrap_or(0);
        self.max_priority() != min
    }
}

/// Enum-based demo selection for no_std environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Demo {
    /// Press classifier reconfiguring a suspendable LED
    LedToggle,
    /// Two periodic emitters sharing a mutex-guarded UART
    GuardedEmitters,
    /// Edge reporters and a periodic producer feeding one queue consumer
    MessageQueue,
}

impl Demo {
    fn config(&self) -> &'static dyn DemoConfig {
        match self {
            Demo::LedToggle => &led_toggle::LedToggleDemo,
            Demo::GuardedEmitters => &guarded_emitters::GuardedEmittersDemo,
            Demo::MessageQueue => &message_queue::MessageQueueDemo,
        }
    }
}

impl DemoConfig for Demo {
    fn demo_name(&self) -> &'static str {
        self.config().demo_name()
    }

    fn description(&self) -> &'static str {
        self.config().description()
    }

    fn tasks(&self) -> &'static [TaskSpec] {
        self.config().tasks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_firmware_binaries() {
        assert_eq!(Demo::LedToggle.demo_name(), "led_toggle");
        assert_eq!(Demo::GuardedEmitters.demo_name(), "guarded_emitters");
        assert_eq!(Demo::MessageQueue.demo_name(), "message_queue");
    }

    #[test]
    fn only_guarded_emitters_mixes_priorities() {
        assert!(Demo::GuardedEmitters.needs_preemption());
        assert_eq!(Demo::GuardedEmitters.max_priority(), 2);
        assert!(!Demo::LedToggle.needs_preemption());
        assert!(!Demo::MessageQueue.needs_preemption());
    }

    #[test]
    fn task_counts() {
        assert_eq!(Demo::LedToggle.task_count(), 2);
        assert_eq!(Demo::GuardedEmitters.task_count(), 2);
        assert_eq!(Demo::MessageQueue.task_count(), 4);
    }
}

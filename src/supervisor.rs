//! Application supervisor and monitoring
//!
//! Prints the startup banner for the selected demo, keeps an uptime count
//! and reports status periodically. Fatal initialization failures end in
//! [`AppSupervisor::halt`].

use embassy_time::{Duration, Timer};

use crate::config::{STATUS_REPORT_SECS, SUPERVISOR_TICK_SECS};
use crate::demo::{Demo, DemoConfig};
use crate::types::APP_VERSION;

/// Uptime split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uptime {
    pub hours: u32,
    pub minutes: u32,
}

impl Uptime {
    pub fn from_secs(secs: u32) -> Self {
        let minutes = secs / 60;
        Self {
            hours: minutes / 60,
            minutes: minutes % 60,
        }
    }
}

/// Application supervisor responsible for monitoring and lifecycle management
pub struct AppSupervisor {
    demo: Demo,
    uptime_seconds: u32,
    last_report: u32,
}

impl AppSupervisor {
    pub fn new_for_demo(demo: Demo) -> Self {
        Self {
            demo,
            uptime_seconds: 0,
            last_report: 0,
        }
    }

    pub fn demo(&self) -> Demo {
        self.demo
    }

    /// Print application startup banner with the task topology
    pub fn print_startup_banner(&self) {
        let demo = self.demo;

        info!("========================================");
        info!("rtcoord v{}", APP_VERSION.as_string());
        info!("Demo: {}", demo.demo_name());
        info!("{}", demo.description());
        info!("========================================");
        info!("Hardware: RP2040 (Raspberry Pi Pico)");
        for task in demo.tasks() {
            info!(
                "Task '{}': priority {}, stack {} words",
                task.name, task.priority, task.stack_words
            );
        }
        if demo.needs_preemption() {
            info!("Preemption: interrupt executor for priority {}", demo.max_priority());
        }
        info!("========================================");
    }

    pub fn print_init_success(&self) {
        info!(
            "{} initialized, {} tasks running",
            self.demo.demo_name(),
            self.demo.task_count()
        );
    }

    /// Advance uptime by `secs`; returns true when a status report is due
    pub fn tick(&mut self, secs: u32) -> bool {
        self.uptime_seconds = self.uptime_seconds.saturating_add(secs);
        if self.uptime_seconds - self.last_report >= STATUS_REPORT_SECS {
            self.last_report = self.uptime_seconds;
            true
        } else {
            false
        }
    }

    /// Run the main supervisor loop
    pub async fn run(&mut self) -> ! {
        info!("Application supervisor started");

        loop {
            Timer::after(Duration::from_secs(SUPERVISOR_TICK_SECS)).await;
            if self.tick(SUPERVISOR_TICK_SECS as u32) {
                self.print_status();
            }
        }
    }

    fn print_status(&self) {
        let uptime = Uptime::from_secs(self.uptime_seconds);
        if uptime.hours > 0 {
            info!("Status: Uptime {}h{}m", uptime.hours, uptime.minutes);
        } else {
            info!("Status: Uptime {}m", uptime.minutes);
        }
    }

    pub fn uptime(&self) -> u32 {
        self.uptime_seconds
    }

    /// Stop here after a fatal initialization error
    pub fn halt() -> ! {
        error!("Halting");
        loop {
            #[cfg(feature = "rp2040")]
            cortex_m::asm::wfe();
            #[cfg(not(feature = "rp2040"))]
            core::hint::spin_loop();
        }
    }
}

//! Guarded emitters firmware
//!
//! - "Task 1" bursts every 100 ms from the interrupt executor (priority 2)
//! - "Task 2" bursts every 500 ms with a busy loop from thread mode (priority 1)
//! - Both share UART0 TX (GPIO0, 115200 8N1) through one output guard

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use panic_halt as _;
use defmt_rtt as _;
use static_cell::StaticCell;

use rtcoord::demo::Demo;
use rtcoord::hardware;
use rtcoord::supervisor::AppSupervisor;

const DEMO: Demo = Demo::GuardedEmitters;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    let supervisor = AppSupervisor::new_for_demo(DEMO);
    supervisor.print_startup_banner();

    let uart = hardware::init_shared_uart(p.UART0, p.PIN_0);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    if let Err(e) = hardware::init_high_priority_emitter(&high, uart) {
        error!("Failed to spawn high priority emitter: {:?}", e);
        AppSupervisor::halt();
    }

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        let spawned = hardware::init_low_priority_emitter(&spawner, uart)
            .and_then(|()| spawner.spawn(hardware::supervisor_task(supervisor)));
        if let Err(e) = spawned {
            error!("Failed to spawn low priority tasks: {:?}", e);
            AppSupervisor::halt();
        }
    })
}

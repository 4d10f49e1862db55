//! Message queue firmware
//!
//! - Buttons on GPIO2 and GPIO3 (active high) report every edge
//! - A producer queues "Periodic Message" every 100 ms
//! - One consumer drains the queue to UART0 TX (GPIO0, 115200 8N1) every 50 ms

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Executor;
use panic_halt as _;
use defmt_rtt as _;
use static_cell::StaticCell;

use rtcoord::demo::Demo;
use rtcoord::hardware;
use rtcoord::supervisor::AppSupervisor;

const DEMO: Demo = Demo::MessageQueue;

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    let supervisor = AppSupervisor::new_for_demo(DEMO);
    supervisor.print_startup_banner();

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        let spawned = hardware::init_message_queue(&spawner, p)
            .and_then(|()| spawner.spawn(hardware::supervisor_task(supervisor)));
        if let Err(e) = spawned {
            error!("Failed to spawn demo tasks: {:?}", e);
            AppSupervisor::halt();
        }
    })
}

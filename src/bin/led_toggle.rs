//! LED toggle firmware
//!
//! - Button on GPIO2 (active high)
//! - LED on GPIO25 (Pico on-board LED)
//! - Short press: LED off, Medium press: 400 ms blink, Long press: 100 ms blink

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

const DEMO: Demo = Demo::LedToggle;

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    let supervisor = AppSupervisor::new_for_demo(DEMO);
    supervisor.print_startup_banner();

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        let spawned = hardware::init_led_toggle(&spawner, p)
            .and_then(|()| spawner.spawn(hardware::supervisor_task(supervisor)));
        if let Err(e) = spawned {
            error!("Failed to spawn demo tasks: {:?}", e);
            AppSupervisor::halt();
        }
    })
}

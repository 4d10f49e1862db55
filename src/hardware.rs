//! Hardware bindings and task spawning for the RP2040
//!
//! Binds the portable task bodies to Pico pins, the UART0 transmitter and
//! the Embassy time driver, and spawns each demo's task set. Buttons are
//! active high with the internal pull-down enabled.

use embassy_executor::{SendSpawner, SpawnError, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{PIN_0, UART0};
use embassy_rp::uart::{self, Blocking, UartTx};
use embassy_rp::{Peri, Peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use static_cell::StaticCell;

use crate::actuator::Actuator;
use crate::buttons::{EdgeReporter, PressMonitor};
use crate::channels::{ACTUATOR_LINK, MESSAGE_QUEUE};
use crate::config::{EdgeReporterConfig, EmitterConfig, UART_BAUD_RATE};
use crate::demo::{guarded_emitters, led_toggle, message_queue};
use crate::emitter::{PeriodicEmitter, PeriodicProducer, QueueConsumer};
use crate::error::{Error, Result};
use crate::guard::OutputGuard;
use crate::sink::ByteSink;
use crate::stop::StopToken;
use crate::supervisor::AppSupervisor;

/// Blocking UART0 transmitter used as the output sink
pub type Uart = UartTx<'static, Blocking>;

/// UART shared between the guarded emitters
pub type SharedUart = OutputGuard<CriticalSectionRawMutex, Uart>;

static SHARED_UART: StaticCell<SharedUart> = StaticCell::new();

type Stop = StopToken<CriticalSectionRawMutex>;

/// One stop request per spawned task; a token is observed by a single loop
static STOPS: [Stop; 4] = [const { Stop::new() }; 4];

impl ByteSink for Uart {
    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.blocking_write(bytes).map_err(|_| Error::Sink)
    }
}

/// Configure UART0 TX on GPIO0 at the configured baud rate
pub fn init_uart(uart: Peri<'static, UART0>, tx: Peri<'static, PIN_0>) -> Uart {
    let mut config = uart::Config::default();
    config.baudrate = UART_BAUD_RATE;
    UartTx::new_blocking(uart, tx, config)
}

// ===================================================================
// LED Toggle Demo
// ===================================================================

/// Spawn the actuator and press monitor on GPIO25 / GPIO2
pub fn init_led_toggle(spawner: &Spawner, p: Peripherals) -> core::result::Result<(), SpawnError> {
    info!("Initializing LED toggle hardware");

    let led = Output::new(p.PIN_25, Level::Low);
    let button = Input::new(p.PIN_2, Pull::Down);

    spawner.spawn(actuator_task(led, &STOPS[0]))?;
    spawner.spawn(press_monitor_task(button, &STOPS[1]))?;
    Ok(())
}

#[embassy_executor::task]
pub async fn actuator_task(led: Output<'static>, stop: &'static Stop) {
    let mut actuator = Actuator::new(led, led_toggle::INITIAL_LED, &ACTUATOR_LINK);
    if let Err(e) = actuator.run(&mut Delay, stop).await {
        error!("Actuator task failed: {:?}", e);
    }
}

#[embassy_executor::task]
pub async fn press_monitor_task(button: Input<'static>, stop: &'static Stop) {
    let mut monitor = match PressMonitor::new(button, led_toggle::CLASSIFIER, &ACTUATOR_LINK) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("Press monitor init failed: {:?}", e);
            AppSupervisor::halt();
        }
    };
    if let Err(e) = monitor.run(&mut Delay, stop).await {
        error!("Press monitor failed: {:?}", e);
    }
}

// ===================================================================
// Guarded Emitters Demo
// ===================================================================

/// Wrap UART0 in the output guard shared by both emitters
pub fn init_shared_uart(uart: Peri<'static, UART0>, tx: Peri<'static, PIN_0>) -> &'static SharedUart {
    SHARED_UART.init(OutputGuard::new(init_uart(uart, tx)))
}

/// Spawn the faster emitter on the preempting (interrupt) executor
pub fn init_high_priority_emitter(
    spawner: &SendSpawner,
    uart: &'static SharedUart,
) -> core::result::Result<(), SpawnError> {
    spawner.spawn(emitter_task(guarded_emitters::TASK1, uart, &STOPS[0]))
}

/// Spawn the slower, CPU-heavy emitter on the thread-mode executor
pub fn init_low_priority_emitter(
    spawner: &Spawner,
    uart: &'static SharedUart,
) -> core::result::Result<(), SpawnError> {
    spawner.spawn(emitter_task(guarded_emitters::TASK2, uart, &STOPS[1]))
}

#[embassy_executor::task(pool_size = 2)]
pub async fn emitter_task(config: EmitterConfig, uart: &'static SharedUart, stop: &'static Stop) {
    let mut emitter = PeriodicEmitter::new(config, uart);
    if let Err(e) = emitter.run(&mut Delay, stop).await {
        error!("Emitter {} failed: {:?}", config.label, e);
    }
}

// ===================================================================
// Message Queue Demo
// ===================================================================

/// Spawn both edge reporters, the periodic producer and the consumer
pub fn init_message_queue(spawner: &Spawner, p: Peripherals) -> core::result::Result<(), SpawnError> {
    info!("Initializing message queue hardware");

    let button1 = Input::new(p.PIN_2, Pull::Down);
    let button2 = Input::new(p.PIN_3, Pull::Down);
    let uart = init_uart(p.UART0, p.PIN_0);

    spawner.spawn(edge_reporter_task(button1, message_queue::BUTTON1, &STOPS[0]))?;
    spawner.spawn(edge_reporter_task(button2, message_queue::BUTTON2, &STOPS[1]))?;
    spawner.spawn(producer_task(&STOPS[2]))?;
    spawner.spawn(consumer_task(uart, &STOPS[3]))?;
    Ok(())
}

#[embassy_executor::task(pool_size = 2)]
pub async fn edge_reporter_task(
    button: Input<'static>,
    config: EdgeReporterConfig,
    stop: &'static Stop,
) {
    let mut reporter = match EdgeReporter::new(button, config, &MESSAGE_QUEUE) {
        Ok(reporter) => reporter,
        Err(e) => {
            error!("Edge reporter {} init failed: {:?}", config.label, e);
            AppSupervisor::halt();
        }
    };
    if let Err(e) = reporter.run(&mut Delay, stop).await {
        error!("Edge reporter {} failed: {:?}", config.label, e);
    }
}

#[embassy_executor::task]
pub async fn producer_task(stop: &'static Stop) {
    let mut producer = match PeriodicProducer::new(message_queue::PRODUCER, &MESSAGE_QUEUE) {
        Ok(producer) => producer,
        Err(e) => {
            error!("Periodic producer init failed: {:?}", e);
            AppSupervisor::halt();
        }
    };
    if let Err(e) = producer.run(&mut Delay, stop).await {
        error!("Periodic producer failed: {:?}", e);
    }
}

#[embassy_executor::task]
pub async fn consumer_task(uart: Uart, stop: &'static Stop) {
    let mut consumer = QueueConsumer::new(message_queue::CONSUMER, &MESSAGE_QUEUE, uart);
    if let Err(e) = consumer.run(&mut Delay, stop).await {
        error!("Queue consumer failed: {:?}", e);
    }
}

// ===================================================================
// Supervision
// ===================================================================

#[embassy_executor::task]
pub async fn supervisor_task(mut supervisor: AppSupervisor) {
    supervisor.print_init_success();
    supervisor.run().await
}

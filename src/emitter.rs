//! Periodic message emitters and the queue consumer
//!
//! Two patterns share one output sink:
//! - [`PeriodicEmitter`]s write bursts directly to the sink while holding its
//!   [`OutputGuard`]; the guard alone keeps bursts from interleaving.
//! - [`PeriodicProducer`]s (and the edge reporters) push records into the
//!   bounded queue, and a single [`QueueConsumer`] drains it to the sink.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::channels::{MessageQueue, Timeout};
use crate::config::{ConsumerConfig, EmitterConfig, ProducerConfig};
use crate::error::Result;
use crate::guard::OutputGuard;
use crate::sink::ByteSink;
use crate::stop::StopToken;
use crate::types::Message;

// ===================================================================
// Simulated Workload
// ===================================================================

/// Synchronous, bounded CPU work run between messages
pub trait Workload {
    fn run(&mut self);
}

/// Busy loop of a fixed number of iterations; never yields to the scheduler
#[derive(Debug, Clone, Copy)]
pub struct BusyLoad {
    iterations: u32,
}

impl BusyLoad {
    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Workload for BusyLoad {
    fn run(&mut self) {
        for i in 0..self.iterations {
            core::hint::black_box(i);
        }
    }
}

// ===================================================================
// Guarded Emitter
// ===================================================================

/// Emits bursts of numbered messages to a guarded sink
pub struct PeriodicEmitter<'a, M: RawMutex, S: ByteSink, W: Workload = BusyLoad> {
    config: EmitterConfig,
    guard: &'a OutputGuard<M, S>,
    workload: W,
    bursts: u32,
}

impl<'a, M: RawMutex, S: ByteSink> PeriodicEmitter<'a, M, S, BusyLoad> {
    pub fn new(config: EmitterConfig, guard: &'a OutputGuard<M, S>) -> Self {
        Self::with_workload(config, guard, BusyLoad::new(config.workload_iterations))
    }
}

impl<'a, M: RawMutex, S: ByteSink, W: Workload> PeriodicEmitter<'a, M, S, W> {
    pub fn with_workload(config: EmitterConfig, guard: &'a OutputGuard<M, S>, workload: W) -> Self {
        Self {
            config,
            guard,
            workload,
            bursts: 0,
        }
    }

    /// Hold the guard for `burst_len` messages, sleeping between them
    pub async fn burst<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        let mut sink = self.guard.acquire(Timeout::Forever).await?;
        debug!("{}: burst {} started", self.config.label, self.bursts);

        for id in 0..self.config.burst_len {
            let message = Message::format(format_args!("{} - Message {}\n", self.config.label, id))?;
            sink.put_message(&message)?;
            self.workload.run();
            delay.delay_ms(self.config.message_delay_ms).await;
        }

        OutputGuard::release(sink);
        self.bursts = self.bursts.wrapping_add(1);
        Ok(())
    }

    /// One burst followed by the inter-burst gap
    pub async fn step<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.burst(delay).await?;
        delay.delay_ms(self.config.burst_gap_ms).await;
        Ok(())
    }

    pub async fn run<D: DelayNs, C: RawMutex>(
        &mut self,
        delay: &mut D,
        stop: &StopToken<C>,
    ) -> Result<()> {
        info!("Emitter {} started", self.config.label);
        while !stop.is_stopped() {
            if let Either::Second(result) = select(stop.wait(), self.step(delay)).await {
                result?;
            }
        }
        info!("Emitter {} stopped after {} bursts", self.config.label, self.bursts);
        Ok(())
    }

    /// Completed bursts
    pub fn bursts(&self) -> u32 {
        self.bursts
    }
}

// ===================================================================
// Queue Producer / Consumer
// ===================================================================

/// Queues the same message at a fixed period
pub struct PeriodicProducer<'a, M: RawMutex> {
    config: ProducerConfig,
    message: Message,
    queue: &'a MessageQueue<M>,
}

impl<'a, M: RawMutex> PeriodicProducer<'a, M> {
    pub fn new(config: ProducerConfig, queue: &'a MessageQueue<M>) -> Result<Self> {
        Ok(Self {
            config,
            message: Message::new(config.text)?,
            queue,
        })
    }

    pub async fn step<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.queue.send(self.message.clone(), Timeout::Forever).await?;
        delay.delay_ms(self.config.period_ms).await;
        Ok(())
    }

    pub async fn run<D: DelayNs, C: RawMutex>(
        &mut self,
        delay: &mut D,
        stop: &StopToken<C>,
    ) -> Result<()> {
        info!("Periodic producer started");
        while !stop.is_stopped() {
            if let Either::Second(result) = select(stop.wait(), self.step(delay)).await {
                result?;
            }
        }
        Ok(())
    }
}

/// Single consumer draining the message queue into a sink it owns
pub struct QueueConsumer<'a, M: RawMutex, S: ByteSink> {
    config: ConsumerConfig,
    queue: &'a MessageQueue<M>,
    sink: S,
    consumed: u32,
}

impl<'a, M: RawMutex, S: ByteSink> QueueConsumer<'a, M, S> {
    pub fn new(config: ConsumerConfig, queue: &'a MessageQueue<M>, sink: S) -> Self {
        Self {
            config,
            queue,
            sink,
            consumed: 0,
        }
    }

    /// Wait for the next record, write it out, then sleep
    pub async fn step<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        let message = self.queue.receive(Timeout::Forever).await?;
        self.sink.put_message(&message)?;
        self.consumed = self.consumed.wrapping_add(1);
        delay.delay_ms(self.config.period_ms).await;
        Ok(())
    }

    pub async fn run<D: DelayNs, C: RawMutex>(
        &mut self,
        delay: &mut D,
        stop: &StopToken<C>,
    ) -> Result<()> {
        info!("Queue consumer started");
        while !stop.is_stopped() {
            if let Either::Second(result) = select(stop.wait(), self.step(delay)).await {
                result?;
            }
        }
        info!("Queue consumer stopped after {} messages", self.consumed);
        Ok(())
    }

    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDelay;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::format;
    use std::vec::Vec;

    type Log = heapless::Vec<u8, 1024>;

    struct CountingLoad(u32);

    impl Workload for CountingLoad {
        fn run(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn bursts_never_interleave() {
        let guard = OutputGuard::<NoopRawMutex, Log>::new(Log::new());
        {
            let mut fast =
                PeriodicEmitter::new(EmitterConfig::new("Task 1", 100).with_burst_len(3), &guard);
            let mut slow = PeriodicEmitter::new(
                EmitterConfig::new("Task 2", 500)
                    .with_burst_len(3)
                    .with_workload(1000),
                &guard,
            );

            block_on(join(
                async {
                    let mut delay = TestDelay::new().yielding();
                    for _ in 0..3 {
                        fast.step(&mut delay).await.unwrap();
                    }
                },
                async {
                    let mut delay = TestDelay::new().yielding();
                    for _ in 0..3 {
                        slow.step(&mut delay).await.unwrap();
                    }
                },
            ));
            assert_eq!(fast.bursts(), 3);
            assert_eq!(slow.bursts(), 3);
        }

        let log = block_on(guard.acquire(Timeout::Poll)).unwrap();
        let text = core::str::from_utf8(&log).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 18);

        let mut labels = Vec::new();
        for burst in lines.chunks(3) {
            let label = burst[0].split(" - ").next().unwrap();
            for (id, line) in burst.iter().enumerate() {
                assert_eq!(*line, format!("{} - Message {}", label, id));
            }
            labels.push(label);
        }
        assert_eq!(labels.iter().filter(|l| **l == "Task 1").count(), 3);
        assert_eq!(labels.iter().filter(|l| **l == "Task 2").count(), 3);
    }

    #[test]
    fn burst_runs_workload_and_delays_per_message() {
        let guard = OutputGuard::<NoopRawMutex, Log>::new(Log::new());
        let mut delay = TestDelay::new();
        {
            let config = EmitterConfig::new("Task 2", 500).with_burst_len(4);
            let mut emitter = PeriodicEmitter::with_workload(config, &guard, CountingLoad(0));
            block_on(emitter.step(&mut delay)).unwrap();
            assert_eq!(emitter.workload.0, 4);
        }
        assert_eq!(delay.delays, [500, 500, 500, 500, 1]);
    }

    #[test]
    fn default_emitter_uses_configured_busy_loop() {
        let guard = OutputGuard::<NoopRawMutex, Log>::new(Log::new());
        let config = EmitterConfig::new("Task 2", 500).with_workload(100_000);
        let emitter = PeriodicEmitter::new(config, &guard);
        assert_eq!(emitter.workload.iterations(), 100_000);
    }

    #[test]
    fn guard_is_released_after_burst() {
        let guard = OutputGuard::<NoopRawMutex, Log>::new(Log::new());
        let mut delay = TestDelay::new();
        let mut emitter =
            PeriodicEmitter::new(EmitterConfig::new("Task 1", 100).with_burst_len(1), &guard);
        block_on(emitter.burst(&mut delay)).unwrap();
        assert!(block_on(guard.acquire(Timeout::Poll)).is_ok());
    }

    #[test]
    fn consumer_writes_records_in_queue_order() {
        let queue = MessageQueue::<NoopRawMutex>::new();
        let mut producer = PeriodicProducer::new(ProducerConfig::new(), &queue).unwrap();
        let mut consumer = QueueConsumer::new(ConsumerConfig::new(), &queue, Log::new());
        let mut delay = TestDelay::new();

        block_on(async {
            queue
                .send(Message::new("Button1 Rising Edge\n").unwrap(), Timeout::Poll)
                .await
                .unwrap();
            producer.step(&mut delay).await.unwrap();
            for _ in 0..2 {
                consumer.step(&mut delay).await.unwrap();
            }
        });

        assert_eq!(consumer.consumed(), 2);
        assert_eq!(delay.delays, [100, 50, 50]);
        let out = consumer.into_sink();
        assert_eq!(&out[..], b"Button1 Rising Edge\nPeriodic Message\n");
    }
}

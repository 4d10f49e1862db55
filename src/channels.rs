//! Inter-task communication channels
//!
//! This module defines the bounded message queue (many producers, one
//! consumer), the single-slot link that carries classifier decisions to the
//! actuator, and the static instances used by the firmware binaries.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};

use crate::config::MESSAGE_QUEUE_LEN;
use crate::error::{Error, Result};
use crate::types::{ActuatorCommand, Message};

/// How long a blocking queue or guard operation may wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Do not wait: fail immediately if the operation cannot complete
    Poll,
    /// Wait at most this long
    After(Duration),
    /// Block until the operation completes; never fails with `Error::Timeout`
    Forever,
}

impl Timeout {
    /// `0` means poll, anything else a bounded wait
    pub const fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Timeout::Poll
        } else {
            Timeout::After(Duration::from_millis(ms))
        }
    }
}

/// Fixed-capacity FIFO queue with timeout-aware send and receive
///
/// Enqueue and dequeue bookkeeping happens under the raw mutex `M`, so
/// concurrent senders never claim the same free slot and records leave the
/// queue in arrival order.
pub struct BoundedQueue<M: RawMutex, T, const N: usize> {
    inner: Channel<M, T, N>,
}

impl<M: RawMutex, T, const N: usize> BoundedQueue<M, T, N> {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Enqueue `item` at the tail, waiting for a free slot according to `timeout`
    ///
    /// On failure the item is dropped.
    pub async fn send(&self, item: T, timeout: Timeout) -> Result<()> {
        match timeout {
            Timeout::Forever => self.inner.send(item).await,
            Timeout::Poll => self.inner.try_send(item).map_err(|_| Error::Timeout)?,
            Timeout::After(limit) => with_timeout(limit, self.inner.send(item))
                .await
                .map_err(|_| {
                    warn!("queue: send timed out after {} ms", limit.as_millis());
                    Error::Timeout
                })?,
        }
        trace!("queue: enqueued, occupancy {}/{}", self.len(), N);
        Ok(())
    }

    /// Dequeue the head record, waiting for one according to `timeout`
    pub async fn receive(&self, timeout: Timeout) -> Result<T> {
        let item = match timeout {
            Timeout::Forever => self.inner.receive().await,
            Timeout::Poll => self.inner.try_receive().map_err(|_| Error::Timeout)?,
            Timeout::After(limit) => with_timeout(limit, self.inner.receive())
                .await
                .map_err(|_| {
                    warn!("queue: receive timed out after {} ms", limit.as_millis());
                    Error::Timeout
                })?,
        };
        trace!("queue: dequeued, occupancy {}/{}", self.len(), N);
        Ok(item)
    }

    /// Current occupancy
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, T, const N: usize> Default for BoundedQueue<M, T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue of message records shared by the producers and the consumer
pub type MessageQueue<M> = BoundedQueue<M, Message, MESSAGE_QUEUE_LEN>;

/// Single-slot, last-writer-wins link from the press classifier to the actuator
pub type ActuatorLink<M> = Signal<M, ActuatorCommand>;

/// Message queue for the queue demo: edge reporters and periodic producer to consumer
/// Buffer size: 10 records
pub static MESSAGE_QUEUE: MessageQueue<CriticalSectionRawMutex> = MessageQueue::new();

/// Actuator reconfiguration for the LED demo
pub static ACTUATOR_LINK: ActuatorLink<CriticalSectionRawMutex> = Signal::new();

#[cfg(test)]
mod tests {
    use super::*;
    use core::pin::pin;
    use embassy_futures::join::join;
    use embassy_futures::{block_on, poll_once};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    fn msg(text: &str) -> Message {
        Message::new(text).unwrap()
    }

    #[test]
    fn receives_in_send_order() {
        let queue = MessageQueue::<NoopRawMutex>::new();
        let texts = ["a\n", "b\n", "c\n", "d\n", "e\n", "f\n", "g\n", "h\n", "i\n", "j\n"];

        block_on(async {
            for text in texts {
                queue.send(msg(text), Timeout::Forever).await.unwrap();
            }
            assert!(queue.is_full());
            for text in texts {
                let received = queue.receive(Timeout::Forever).await.unwrap();
                assert_eq!(received.as_str(), text);
            }
        });
        assert!(queue.is_empty());
    }

    #[test]
    fn poll_send_fails_when_full() {
        let queue = BoundedQueue::<NoopRawMutex, u8, 2>::new();
        block_on(async {
            queue.send(1, Timeout::Poll).await.unwrap();
            queue.send(2, Timeout::Poll).await.unwrap();
            assert_eq!(queue.send(3, Timeout::Poll).await, Err(Error::Timeout));
        });
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.capacity(), 2);
    }

    #[test]
    fn blocked_send_completes_after_receive() {
        let queue = BoundedQueue::<NoopRawMutex, u8, 1>::new();
        block_on(queue.send(1, Timeout::Forever)).unwrap();

        let mut pending = pin!(queue.send(2, Timeout::Forever));
        assert!(poll_once(pending.as_mut()).is_pending());
        assert!(poll_once(pending.as_mut()).is_pending());
        assert_eq!(queue.len(), 1);

        assert_eq!(block_on(queue.receive(Timeout::Poll)), Ok(1));
        assert_eq!(block_on(pending), Ok(()));
        assert_eq!(block_on(queue.receive(Timeout::Poll)), Ok(2));
    }

    #[test]
    fn poll_receive_on_empty_times_out() {
        let queue = BoundedQueue::<NoopRawMutex, u8, 4>::new();
        assert_eq!(block_on(queue.receive(Timeout::Poll)), Err(Error::Timeout));
    }

    #[test]
    fn bounded_receive_times_out() {
        let queue = BoundedQueue::<NoopRawMutex, u8, 4>::new();
        let result = block_on(queue.receive(Timeout::from_millis(5)));
        assert_eq!(result, Err(Error::Timeout));
    }

    #[test]
    fn bounded_send_times_out_when_full() {
        let queue = BoundedQueue::<NoopRawMutex, u8, 1>::new();
        block_on(queue.send(1, Timeout::Poll)).unwrap();

        let result = block_on(queue.send(2, Timeout::from_millis(5)));
        assert_eq!(result, Err(Error::Timeout));
        assert_eq!(queue.len(), queue.capacity());
        assert_eq!(block_on(queue.receive(Timeout::Poll)), Ok(1));
    }

    #[test]
    fn producers_interleave_in_arrival_order() {
        let queue = BoundedQueue::<NoopRawMutex, (u8, u8), 3>::new();
        let mut order = [(0u8, 0u8); 8];

        block_on(async {
            let shared = &queue;
            let producer = move |id: u8| async move {
                for seq in 0..4 {
                    shared.send((id, seq), Timeout::Forever).await.unwrap();
                }
            };
            let consumer = async {
                for slot in order.iter_mut() {
                    *slot = queue.receive(Timeout::Forever).await.unwrap();
                }
            };
            join(join(producer(1), producer(2)), consumer).await;
        });

        // Each producer's records stay in program order
        for id in [1u8, 2] {
            let seqs = order.iter().filter(|(p, _)| *p == id).map(|(_, s)| *s);
            assert!(seqs.eq(0u8..4));
        }
    }

    #[test]
    fn zero_millis_is_poll() {
        assert_eq!(Timeout::from_millis(0), Timeout::Poll);
        assert_eq!(
            Timeout::from_millis(20),
            Timeout::After(Duration::from_millis(20))
        );
    }
}

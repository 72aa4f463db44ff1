//! Blocking handoff queue.
//!
//! A `Mutex`-guarded buffer paired with a `Condvar`. Senders never block
//! (there is no capacity limit); receivers sleep until an item is available
//! or the queue is closed. Every send wakes all waiters, so several threads
//! may race for one item: the winner takes it and the rest go back to sleep.
//!
//! Retrieval is last-in-first-out by default. A waiter that falls behind sees
//! the newest phase first, not the backlog in the order it was produced.

mod error;

pub use error::QueueError;

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// End of the buffer that `receive` pops from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalOrder {
    /// Pop the most recently sent item.
    #[default]
    Lifo,
    /// Pop the oldest item.
    Fifo,
}

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> Inner<T> {
    fn pop(&mut self, order: RetrievalOrder) -> Option<T> {
        match order {
            RetrievalOrder::Lifo => self.items.pop_back(),
            RetrievalOrder::Fifo => self.items.pop_front(),
        }
    }
}

/// Unbounded blocking queue for handing values between threads.
///
/// # Example
///
/// ```rust
/// use phaselight::queue::MessageQueue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue = Arc::new(MessageQueue::new());
///
/// let producer = {
///     let queue = Arc::clone(&queue);
///     thread::spawn(move || {
///         queue.send("a").unwrap();
///         queue.send("b").unwrap();
///     })
/// };
/// producer.join().unwrap();
///
/// // Last in, first out.
/// assert_eq!(queue.receive(), Ok("b"));
/// assert_eq!(queue.receive(), Ok("a"));
/// ```
pub struct MessageQueue<T> {
    inner: Mutex<Inner<T>>,
    item_ready: Condvar,
    order: RetrievalOrder,
    send_delay: Duration,
}

impl<T> MessageQueue<T> {
    /// Create an empty LIFO queue with no send delay.
    pub fn new() -> Self {
        Self::with_order(RetrievalOrder::default())
    }

    /// Create an empty queue that pops from the given end.
    pub fn with_order(order: RetrievalOrder) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                closed: false,
            }),
            item_ready: Condvar::new(),
            order,
            send_delay: Duration::ZERO,
        }
    }

    /// Sleep for `delay` at the start of every `send`, before the lock is taken.
    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    pub fn order(&self) -> RetrievalOrder {
        self.order
    }

    pub fn send_delay(&self) -> Duration {
        self.send_delay
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().expect("message queue lock poisoned")
    }

    /// Push an item and wake every blocked receiver.
    ///
    /// Fails with [`QueueError::Closed`] once [`close`](Self::close) has been
    /// called; the item is dropped.
    pub fn send(&self, item: T) -> Result<(), QueueError> {
        if !self.send_delay.is_zero() {
            thread::sleep(self.send_delay);
        }

        {
            let mut inner = self.lock();
            if inner.closed {
                return Err(QueueError::Closed);
            }
            inner.items.push_back(item);
        }
        self.item_ready.notify_all();
        Ok(())
    }

    /// Block until an item is available and take it.
    ///
    /// Items still buffered when the queue is closed are handed out first;
    /// after that every call returns [`QueueError::Closed`].
    pub fn receive(&self) -> Result<T, QueueError> {
        let mut inner = self.lock();
        loop {
            if let Some(item) = inner.pop(self.order) {
                return Ok(item);
            }
            if inner.closed {
                return Err(QueueError::Closed);
            }
            inner = self
                .item_ready
                .wait(inner)
                .expect("message queue lock poisoned");
        }
    }

    /// Take an item if one is buffered, without blocking.
    pub fn try_receive(&self) -> Option<T> {
        self.lock().pop(self.order)
    }

    /// Refuse further sends and wake every blocked receiver.
    pub fn close(&self) {
        self.lock().closed = true;
        self.item_ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn receive_returns_most_recent_item_first() {
        let queue = MessageQueue::new();
        queue.send('A').unwrap();
        queue.send('B').unwrap();

        assert_eq!(queue.receive(), Ok('B'));
        assert_eq!(queue.receive(), Ok('A'));
        assert!(queue.is_empty());
    }

    #[test]
    fn fifo_order_pops_oldest_item_first() {
        let queue = MessageQueue::with_order(RetrievalOrder::Fifo);
        queue.send(1).unwrap();
        queue.send(2).unwrap();
        queue.send(3).unwrap();

        assert_eq!(queue.receive(), Ok(1));
        assert_eq!(queue.receive(), Ok(2));
        assert_eq!(queue.receive(), Ok(3));
    }

    #[test]
    fn receive_blocks_until_send() {
        let queue = Arc::new(MessageQueue::new());
        let sent = Arc::new(AtomicBool::new(false));

        let producer = {
            let queue = Arc::clone(&queue);
            let sent = Arc::clone(&sent);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                sent.store(true, Ordering::SeqCst);
                queue.send(7).unwrap();
            })
        };

        let start = Instant::now();
        assert_eq!(queue.receive(), Ok(7));
        assert!(sent.load(Ordering::SeqCst));
        assert!(start.elapsed() >= Duration::from_millis(40));
        producer.join().unwrap();
    }

    #[test]
    fn close_wakes_blocked_receiver() {
        let queue: Arc<MessageQueue<u8>> = Arc::new(MessageQueue::new());

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.receive())
        };

        thread::sleep(Duration::from_millis(20));
        queue.close();

        assert_eq!(consumer.join().unwrap(), Err(QueueError::Closed));
    }

    #[test]
    fn closed_queue_drains_before_reporting_closed() {
        let queue = MessageQueue::new();
        queue.send(1).unwrap();
        queue.send(2).unwrap();
        queue.close();

        assert!(queue.is_closed());
        assert_eq!(queue.send(3), Err(QueueError::Closed));
        assert_eq!(queue.receive(), Ok(2));
        assert_eq!(queue.receive(), Ok(1));
        assert_eq!(queue.receive(), Err(QueueError::Closed));
    }

    #[test]
    fn each_item_reaches_exactly_one_waiter() {
        let queue = Arc::new(MessageQueue::new());

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.receive())
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        for i in 0..4 {
            queue.send(i).unwrap();
        }

        let mut received: Vec<i32> = consumers
            .into_iter()
            .map(|c| c.join().unwrap().unwrap())
            .collect();
        received.sort_unstable();

        assert_eq!(received, vec![0, 1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn try_receive_does_not_block() {
        let queue = MessageQueue::new();
        assert_eq!(queue.try_receive(), None);

        queue.send("x").unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_receive(), Some("x"));
    }

    #[test]
    fn send_delay_is_applied() {
        let queue = MessageQueue::new().with_send_delay(Duration::from_millis(15));
        assert_eq!(queue.send_delay(), Duration::from_millis(15));

        let start = Instant::now();
        queue.send(()).unwrap();

        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn retrieval_order_serializes_as_snake_case() {
        let json = serde_json::to_string(&RetrievalOrder::Lifo).unwrap();
        assert_eq!(json, "\"lifo\"");

        let order: RetrievalOrder = serde_json::from_str("\"fifo\"").unwrap();
        assert_eq!(order, RetrievalOrder::Fifo);
    }
}

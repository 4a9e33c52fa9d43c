use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Notify;

/// Bounded per-user queue of payloads awaiting delivery.
///
/// Pushing never waits: when the queue is full the oldest payload is dropped
/// to make room. Exactly one consumer (the user's deliverer) drains it.
pub struct Outbox {
    queue: Mutex<VecDeque<Bytes>>,
    capacity: usize,
    notify: Notify,
    closed: AtomicBool,
    dropped: AtomicU64,
}

impl Outbox {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
            notify: Notify::new(),
            closed: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
        }
    }

    /// Appends a payload. Returns the payload evicted to make room, if any.
    ///
    /// Once the outbox is closed nothing will drain it, so the payload is
    /// discarded instead.
    pub fn push(&self, payload: Bytes) -> Option<Bytes> {
        let evicted = {
            let mut queue = self.queue.lock();
            // Checked under the queue lock so a concurrent close() clears
            // anything pushed before it.
            if self.is_closed() {
                return None;
            }
            let evicted = if queue.len() >= self.capacity {
                queue.pop_front()
            } else {
                None
            };
            queue.push_back(payload);
            evicted
        };

        if evicted.is_some() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        self.notify.notify_one();
        evicted
    }

    /// Takes the next payload without waiting.
    pub fn pop(&self) -> Option<Bytes> {
        self.queue.lock().pop_front()
    }

    /// Waits for the next payload. Returns `None` once the outbox is closed.
    pub async fn next(&self) -> Option<Bytes> {
        loop {
            if self.is_closed() {
                return None;
            }
            if let Some(payload) = self.pop() {
                return Some(payload);
            }
            // notify_one stores a permit when nobody is waiting, so a push
            // between the pop above and this await is not lost.
            self.notify.notified().await;
        }
    }

    /// Stops the consumer. Pending payloads are discarded.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.queue.lock().clear();
        self.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of payloads discarded because the outbox was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

//! Bounded concurrent FIFO between sensor producers and the manager's
//! per-cycle consumer.
//!
//! # Contract
//! - `push` is non-blocking: a full queue rejects the item and the caller
//!   sees the backpressure (`false`). The drop is the producer's to count.
//! - `try_pop_all` drains up to `max` items in FIFO order without blocking.
//! - Any number of producers; one logical consumer per queue instance.
//! - Critical sections are O(1) per item (`VecDeque` push/pop at the ends).

use std::collections::VecDeque;
use std::sync::Mutex;

/// Thread-safe FIFO of fixed capacity.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    inner: Mutex<VecDeque<T>>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append `item`; returns `false` (item dropped) if the queue is full.
    pub fn push(&self, item: T) -> bool {
        let mut q = self.inner.lock().expect("queue mutex poisoned");
        if q.len() >= self.capacity {
            return false;
        }
        q.push_back(item);
        true
    }

    /// Drain up to `max` items in FIFO order. Non-blocking.
    pub fn try_pop_all(&self, max: usize) -> Vec<T> {
        let mut q = self.inner.lock().expect("queue mutex poisoned");
        let n = q.len().min(max);
        q.drain(..n).collect()
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("queue mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discard everything queued (manager reset/shutdown between cycles).
    pub fn clear(&self) {
        self.inner.lock().expect("queue mutex poisoned").clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

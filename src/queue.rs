//! Blocking FIFO queue of [`Request`]s shared between producers and a single
//! consumer role (the pusher drains `outgoing`; the puller and `retrieve`
//! share `incoming` as producer/consumer).
//!
//! One `parking_lot::Mutex` guards a `VecDeque`; one `parking_lot::Condvar`
//! ("produced") wakes a blocked `pop`. `parking_lot` locks and condvars don't
//! poison and are infallible by construction, so there is no `PoisonError`
//! branch to thread through every call site.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::request::Request;

/// A thread-safe FIFO queue of [`Request`]s.
pub struct Queue {
    items: Mutex<VecDeque<Request>>,
    produced: Condvar,
}

impl Queue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            produced: Condvar::new(),
        }
    }

    /// Append `r` to the tail and wake one blocked popper.
    pub fn push(&self, r: Request) {
        let mut items = self.items.lock();
        items.push_back(r);
        self.produced.notify_one();
    }

    /// Remove and return the head, blocking until one is available.
    ///
    /// Waits on the condvar `while` the queue is empty rather than `if`, so a
    /// spurious wake-up just re-checks the predicate and goes back to
    /// sleeping. `parking_lot::Condvar::wait_while` spells this directly.
    pub fn pop(&self) -> Request {
        let mut items = self.items.lock();
        self.produced
            .wait_while(&mut items, |items| items.is_empty());
        items
            .pop_front()
            .expect("condvar woke with a non-empty queue")
    }

    /// Current number of queued requests.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether the queue currently holds no requests.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

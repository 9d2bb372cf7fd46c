//! Background workers: the pusher (component E) and the puller (component
//! F) of the client's concurrency core.

pub mod puller;
pub mod pusher;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::queue::Queue;

/// State shared between the client facade and both workers.
///
/// Cheap to clone (everything behind an `Arc`), so each worker thread gets
/// its own handle without the client needing to outlive the threads it
/// spawned.
pub(crate) struct Shared {
    pub outgoing: Arc<Queue>,
    pub incoming: Arc<Queue>,
    pub shutdown: Arc<AtomicBool>,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub read_timeout: Duration,
}

impl Shared {
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

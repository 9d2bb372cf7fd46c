//! The public client facade (component D): owns the two queues and the
//! shutdown flag, and drives the pusher/puller lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::debug;

use crate::config::ClientConfig;
use crate::queue::Queue;
use crate::request::Request;
use crate::worker::{self, Shared};

/// The reserved topic and sentinel body used to wake a blocked `retrieve`
/// at shutdown. Overloaded deliberately: a user-level publish to this topic,
/// or with this exact body, is indistinguishable from the shutdown signal.
/// Preserved for compatibility with the original protocol, not "fixed".
pub const SENTINEL: &str = "SHUTDOWN";

/// A pub/sub message-queue client.
///
/// `create` (via [`MessageQueue::new`] / [`MessageQueue::with_config`])
/// never starts the background workers; call [`MessageQueue::start`]
/// explicitly. `stop` publishes the sentinel, flips the shutdown flag, and
/// joins both workers, after which the client is dormant but still usable
/// for inspection (`shutdown()` reads `true`). Shutdown is monotonic, so
/// calling `start` again afterwards spawns workers that observe the flag
/// already set and exit immediately, which is harmless but not a real
/// restart.
pub struct MessageQueue {
    shared: Arc<Shared>,
    pusher: Mutex<Option<JoinHandle<()>>>,
    puller: Mutex<Option<JoinHandle<()>>>,
}

impl MessageQueue {
    /// Create a client with default tuning. Does not start any threads.
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self::with_config(ClientConfig::new(name, host, port))
    }

    /// Create a client from an explicit [`ClientConfig`]. Does not start any
    /// threads.
    pub fn with_config(config: ClientConfig) -> Self {
        let shared = Arc::new(Shared {
            outgoing: Arc::new(Queue::new()),
            incoming: Arc::new(Queue::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
            name: config.name,
            host: config.host,
            port: config.port,
            read_timeout: config.read_timeout,
        });

        Self {
            shared,
            pusher: Mutex::new(None),
            puller: Mutex::new(None),
        }
    }

    /// This client's identity, as used in subscription and retrieval URIs.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Enqueue a `PUT /topic/<topic>` carrying `body` onto `outgoing`.
    pub fn publish(&self, topic: &str, body: impl Into<String>) {
        let uri = format!("/topic/{topic}");
        let request = Request::new(Some("PUT"), Some(uri), Some(body.into()));
        self.shared.outgoing.push(request);
    }

    /// Enqueue a `PUT /subscription/<name>/<topic>` onto `outgoing`.
    pub fn subscribe(&self, topic: &str) {
        self.push_subscription("PUT", topic);
    }

    /// Enqueue a `DELETE /subscription/<name>/<topic>` onto `outgoing`.
    pub fn unsubscribe(&self, topic: &str) {
        self.push_subscription("DELETE", topic);
    }

    fn push_subscription(&self, method: &'static str, topic: &str) {
        let uri = format!("/subscription/{}/{topic}", self.shared.name);
        let request = Request::new(Some(method), Some(uri), None::<String>);
        self.shared.outgoing.push(request);
    }

    /// Block for the next message body, or `None` if the popped message has
    /// no body or its body is exactly the sentinel string.
    pub fn retrieve(&self) -> Option<String> {
        let request = self.shared.incoming.pop();
        match request.body {
            Some(body) if body != SENTINEL => Some(body),
            _ => None,
        }
    }

    /// Subscribe to the sentinel topic (so `stop` can wake us later) and
    /// launch the pusher and puller threads.
    ///
    /// Takes `&self`, not `&mut self`: a caller typically wants one thread
    /// blocked in [`MessageQueue::retrieve`] while another calls
    /// [`MessageQueue::stop`], which requires sharing the client (e.g. via
    /// `Arc<MessageQueue>`) rather than holding it exclusively. The worker
    /// handles live behind their own lock to make that safe.
    pub fn start(&self) {
        self.subscribe(SENTINEL);

        let pusher_shared = self.shared.clone();
        *self.pusher.lock() = Some(
            thread::Builder::new()
                .name(format!("mq-pusher-{}", self.shared.name))
                .spawn(move || worker::pusher::run(pusher_shared))
                .expect("failed to spawn pusher thread"),
        );

        let puller_shared = self.shared.clone();
        *self.puller.lock() = Some(
            thread::Builder::new()
                .name(format!("mq-puller-{}", self.shared.name))
                .spawn(move || worker::puller::run(puller_shared))
                .expect("failed to spawn puller thread"),
        );
    }

    /// Publish the sentinel, flip the shutdown flag, and join both worker
    /// threads. After this returns, no worker is running.
    pub fn stop(&self) {
        self.publish(SENTINEL, SENTINEL);
        self.shared.shutdown.store(true, Ordering::SeqCst);

        if let Some(handle) = self.pusher.lock().take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.puller.lock().take() {
            let _ = handle.join();
        }
    }

    /// Current value of the shutdown flag. Monotonic: once `true`, never
    /// becomes `false` again.
    pub fn shutdown(&self) -> bool {
        self.shared.is_shutdown()
    }
}

impl Drop for MessageQueue {
    fn drop(&mut self) {
        if !self.shared.is_shutdown() && self.pusher.get_mut().is_some() {
            debug!(
                name = %self.shared.name,
                "MessageQueue dropped without calling stop() first; worker threads were left detached"
            );
        }
    }
}

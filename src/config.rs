//! Runtime configuration for a [`crate::client::MessageQueue`].
//!
//! A small, `Clone`-able bag of tuning knobs with a constructor carrying
//! sensible defaults, rather than a long positional argument list on
//! [`crate::client::MessageQueue`] itself.

use std::time::Duration;

/// Tuning knobs for the dialer and workers.
///
/// `name`, `host`, and `port` identify the client and broker and are always
/// required; the rest have defaults matching the original C implementation's
/// behavior (no read timeout, no reconnect delay) except where a bounded
/// read wait is called for (see DESIGN.md).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// This client's identity, used in subscription and retrieval URIs.
    pub name: String,

    /// Broker host.
    pub host: String,

    /// Broker port.
    pub port: u16,

    /// Socket read timeout applied to every connection a worker opens.
    ///
    /// Workers must not use infinite blocking reads, or a broker crash mid-
    /// response could hang `stop` forever. A long-poll GET is expected to
    /// take a while, though, so this needs to be generous enough not to cut
    /// off a legitimate long poll.
    pub read_timeout: Duration,
}

impl ClientConfig {
    /// Build a config with the given identity and default tuning.
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            read_timeout: Duration::from_secs(30),
        }
    }
}

//! Socket dialer: opens a fresh TCP byte-stream to the broker.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::DialError;

/// Resolve `host:port` and connect to the first candidate address that
/// accepts a connection.
///
/// Mirrors the original's `getaddrinfo` + try-each-candidate loop:
/// `ToSocketAddrs` is the std equivalent of `getaddrinfo`, yielding any
/// address family for a stream transport. Transient resolution or
/// connection failures are logged and folded into `None`, and the caller (a
/// worker) is expected to retry at the top of its loop, never to treat this
/// as a fatal error.
pub fn connect(host: &str, port: u16, read_timeout: Duration) -> Option<TcpStream> {
    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(source) => {
            let err = DialError::Resolve {
                host: host.to_string(),
                port,
                source,
            };
            warn!("{err}");
            return None;
        }
    };

    for addr in addrs {
        match TcpStream::connect(addr) {
            Ok(stream) => {
                configure(&stream, read_timeout);
                debug!(%addr, "connected to broker");
                return Some(stream);
            }
            Err(_) => continue,
        }
    }

    warn!(
        "{}",
        DialError::Connect {
            host: host.to_string(),
            port,
        }
    );
    None
}

fn configure(stream: &TcpStream, read_timeout: Duration) {
    if let Err(source) = stream.set_nodelay(true) {
        debug!(%source, "failed to set TCP_NODELAY, continuing without it");
    }
    if let Err(source) = stream.set_read_timeout(Some(read_timeout)) {
        debug!(%source, "failed to set read timeout, continuing without one");
    }
}

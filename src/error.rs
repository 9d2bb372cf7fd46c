//! Internal error types for the transport layer.
//!
//! None of these cross the public API: every fallible internal step
//! collapses to "retry" or "skip" at the worker boundary, and the public
//! surface stays `Option`-based. These enums only exist to give
//! `debug!`/`warn!` call sites a structured `Display` instead of ad hoc
//! string formatting.

use std::io;

/// Reasons a dial to the broker can fail.
#[derive(Debug, thiserror::Error)]
pub enum DialError {
    #[error("unable to resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("unable to connect to {host}:{port}")]
    Connect { host: String, port: u16 },
}

/// Reasons a server response could not be turned into a `Request` body.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("failed to read status line: {0}")]
    StatusLine(#[source] io::Error),

    #[error("failed to read header line: {0}")]
    HeaderLine(#[source] io::Error),

    #[error("200 OK response missing Content-Length header")]
    MissingContentLength,

    #[error("failed to read {expected} body bytes: {source}")]
    ShortBody {
        expected: usize,
        #[source]
        source: io::Error,
    },
}

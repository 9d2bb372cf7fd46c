//! HTTP/1.0 request value, the unit of work carried through both queues.

use std::io::{self, Write};

/// An outgoing or incoming HTTP/1.0 request/response-carrier.
///
/// All three fields are optional, matching the original C structure's
/// nullable `char *` fields. Unlike the C version there is no `next` link.
/// The queue it sits in owns the linkage (see `queue.rs`), so a `Request`
/// never carries a pointer back into a data structure it doesn't know about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub method: Option<String>,
    pub uri: Option<String>,
    pub body: Option<String>,
}

impl Request {
    /// Build a request from optional method/uri/body strings.
    pub fn new(
        method: Option<impl Into<String>>,
        uri: Option<impl Into<String>>,
        body: Option<impl Into<String>>,
    ) -> Self {
        Self {
            method: method.map(Into::into),
            uri: uri.map(Into::into),
            body: body.map(Into::into),
        }
    }

    /// Write the HTTP/1.0 wire form of this request to `stream`.
    ///
    /// Emits nothing if `method` or `uri` is absent. Otherwise emits the
    /// request line, a `Content-Length` header only if `body` is present,
    /// the blank line terminating headers, and the body with no trailing
    /// newline appended.
    pub fn write(&self, stream: &mut impl Write) -> io::Result<()> {
        let (Some(method), Some(uri)) = (&self.method, &self.uri) else {
            return Ok(());
        };

        write!(stream, "{method} {uri} HTTP/1.0\r\n")?;

        match &self.body {
            Some(body) => {
                write!(stream, "Content-Length: {}\r\n\r\n{body}", body.len())?;
            }
            None => {
                write!(stream, "\r\n")?;
            }
        }

        Ok(())
    }
}

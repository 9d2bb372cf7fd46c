//! The puller: long-polls the broker for this client's mailbox and enqueues
//! whatever arrives onto `incoming`.

use std::io::{BufRead, BufReader, Read};
use std::net::TcpStream;
use std::sync::Arc;

use tracing::debug;

use crate::error::ResponseError;
use crate::request::Request;
use crate::socket;
use crate::worker::Shared;

const CONTENT_LENGTH_PREFIX: &str = "Content-Length: ";

/// Run the puller loop until `shared.shutdown` is observed.
///
/// The server is assumed to long-poll: `GET /queue/<name>` only returns once
/// a message is available or the server's own timeout elapses, either way
/// the loop comes back around and re-checks shutdown. There is deliberately
/// no backoff on repeated dial failure, matching the original C client this
/// was ported from (see DESIGN.md).
pub(crate) fn run(shared: Arc<Shared>) {
    while !shared.is_shutdown() {
        let uri = format!("/queue/{}", shared.name);

        let Some(mut stream) = socket::connect(&shared.host, shared.port, shared.read_timeout)
        else {
            continue;
        };

        let request = Request::new(Some("GET"), Some(uri), None::<String>);
        if request.write(&mut stream).is_err() {
            continue;
        }

        match read_response(&stream) {
            Ok(Some(body)) => {
                let mut delivered = request;
                delivered.body = Some(body);
                shared.incoming.push(delivered);
            }
            Ok(None) => {
                // Non-200 response: nothing to deliver.
            }
            Err(source) => {
                debug!(%source, "puller: dropping connection");
            }
        }

        // `stream` closes here, at the end of the loop body.
    }
}

/// Read one HTTP response. Returns `Ok(Some(body))` for a 200 with a body,
/// `Ok(None)` for any other status, and `Err` for a malformed or truncated
/// response; both are treated as transient, never fatal, to the caller.
fn read_response(stream: &TcpStream) -> Result<Option<String>, ResponseError> {
    let mut reader = BufReader::new(stream);

    let status_line = read_line(&mut reader).map_err(ResponseError::StatusLine)?;
    if !status_line.contains("200 OK") {
        return Ok(None);
    }

    let mut content_length = None;
    loop {
        let line = read_line(&mut reader).map_err(ResponseError::HeaderLine)?;
        if line == "\r\n" || line == "\n" {
            break;
        }
        if let Some(rest) = line.strip_prefix(CONTENT_LENGTH_PREFIX) {
            content_length = rest.trim().parse::<usize>().ok();
        }
    }

    let length = content_length.ok_or(ResponseError::MissingContentLength)?;

    let mut body = vec![0u8; length];
    reader
        .read_exact(&mut body)
        .map_err(|source| ResponseError::ShortBody {
            expected: length,
            source,
        })?;

    Ok(Some(String::from_utf8_lossy(&body).into_owned()))
}

fn read_line(reader: &mut impl BufRead) -> std::io::Result<String> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed before a full line was read",
        ));
    }
    Ok(line)
}

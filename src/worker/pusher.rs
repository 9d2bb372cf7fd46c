//! The pusher: drains `outgoing` and sends each request to the broker over
//! a fresh connection, discarding the response.

use std::io::{BufRead, BufReader};
use std::sync::Arc;

use tracing::debug;

use crate::socket;
use crate::worker::Shared;

/// Run the pusher loop until `shared.shutdown` is observed.
///
/// Dials *before* popping from `outgoing` (deliberately not reordered, see
/// DESIGN.md), so a slow producer can leave a freshly dialed connection
/// idle. Shutdown is only observed between iterations; if the pusher is
/// currently blocked in `pop`, it will not wake up on `shutdown` alone. It
/// wakes because `stop` always publishes a sentinel onto `outgoing` first,
/// which is exactly the push this loop is waiting for.
pub(crate) fn run(shared: Arc<Shared>) {
    while !shared.is_shutdown() {
        let Some(mut stream) = socket::connect(&shared.host, shared.port, shared.read_timeout)
        else {
            continue;
        };

        let request = shared.outgoing.pop();

        if let Err(source) = request.write(&mut stream) {
            debug!(%source, "pusher: failed to send request, dropping connection");
            continue;
        }

        let mut reader = BufReader::new(&stream);
        let mut line = String::new();
        if let Err(source) = reader.read_line(&mut line) {
            debug!(%source, "pusher: failed to read response, dropping connection");
            continue;
        }

        // `stream` closes here, at the end of the loop body, one connection per request.
    }
}

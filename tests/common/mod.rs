//! A minimal in-process broker for end-to-end tests.
//!
//! Speaks exactly the wire dialect described in the crate's protocol:
//! `PUT /topic/<topic>`, `PUT`/`DELETE /subscription/<client>/<topic>`, and
//! a long-polling `GET /queue/<client>`. Every publish to a topic is
//! delivered to the mailbox of every client currently subscribed to that
//! topic, matching the "echo broker" the end-to-end scenarios assume.
//!
//! Stands up a real listener in-test rather than mocking the transport
//! (see DESIGN.md for where this convention comes from).

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct BrokerState {
    subscriptions: HashMap<String, HashSet<String>>,
    mailboxes: HashMap<String, VecDeque<String>>,
}

/// A running test broker. Dropping this does not stop the accept thread;
/// the thread is daemonized for the lifetime of the test process, which is
/// fine for a short-lived `cargo test` binary. Call [`EchoBroker::kill`] to
/// stop it deliberately, e.g. to simulate a broker bounce.
pub struct EchoBroker {
    pub port: u16,
    state: Arc<Mutex<BrokerState>>,
    stop: Arc<AtomicBool>,
}

impl EchoBroker {
    /// Bind to an ephemeral localhost port and start accepting connections.
    pub fn spawn() -> Self {
        Self::bind(0, Arc::new(Mutex::new(BrokerState::default())))
    }

    /// Stop accepting new connections and release the port. Connections
    /// already accepted run to completion; nothing new is admitted.
    pub fn kill(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Restart a killed broker on the same port, carrying over its
    /// subscriptions and mailboxes, the way a redeployed broker process
    /// would resume serving its existing clients after a bounce.
    pub fn restart(&self) -> Self {
        Self::bind(self.port, self.state.clone())
    }

    fn bind(port: u16, state: Arc<Mutex<BrokerState>>) -> Self {
        let listener = bind_with_retry(port);
        listener.set_nonblocking(true).expect("set nonblocking");
        let port = listener.local_addr().unwrap().port();
        let stop = Arc::new(AtomicBool::new(false));

        let accept_state = state.clone();
        let accept_stop = stop.clone();
        thread::spawn(move || {
            while !accept_stop.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let state = accept_state.clone();
                        thread::spawn(move || handle_connection(stream, state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
            // `listener` drops here, releasing the port for a `restart`.
        });

        Self { port, state, stop }
    }
}

/// Bind to `port` (0 for an ephemeral one), retrying briefly if the address
/// is still in `TIME_WAIT` from a just-killed listener on the same port.
fn bind_with_retry(port: u16) -> TcpListener {
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    loop {
        match TcpListener::bind(("127.0.0.1", port)) {
            Ok(listener) => return listener,
            Err(_) if std::time::Instant::now() < deadline => {
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => panic!("bind broker listener on port {port}: {e}"),
        }
    }
}

fn handle_connection(mut stream: TcpStream, state: Arc<Mutex<BrokerState>>) {
    let Some((method, uri, body)) = read_request(&stream) else {
        return;
    };

    let mut segments = uri.trim_start_matches('/').splitn(3, '/');
    match (method.as_str(), segments.next()) {
        ("PUT", Some("topic")) => {
            let topic = segments.next().unwrap_or_default().to_string();
            fan_out(&state, &topic, body.unwrap_or_default());
            respond_ok(&mut stream, None);
        }
        ("PUT", Some("subscription")) => {
            let client = segments.next().unwrap_or_default().to_string();
            let topic = segments.next().unwrap_or_default().to_string();
            let mut state = state.lock().unwrap();
            state.subscriptions.entry(topic).or_default().insert(client);
            respond_ok(&mut stream, None);
        }
        ("DELETE", Some("subscription")) => {
            let client = segments.next().unwrap_or_default().to_string();
            let topic = segments.next().unwrap_or_default().to_string();
            let mut state = state.lock().unwrap();
            if let Some(subs) = state.subscriptions.get_mut(&topic) {
                subs.remove(&client);
            }
            respond_ok(&mut stream, None);
        }
        ("GET", Some("queue")) => {
            let client = segments.next().unwrap_or_default().to_string();
            let body = long_poll(&state, &client);
            match body {
                Some(body) => respond_ok(&mut stream, Some(body)),
                None => respond_no_content(&mut stream),
            }
        }
        _ => respond_no_content(&mut stream),
    }
}

fn fan_out(state: &Arc<Mutex<BrokerState>>, topic: &str, body: String) {
    let mut state = state.lock().unwrap();
    let subscribers: Vec<String> = state
        .subscriptions
        .get(topic)
        .map(|s| s.iter().cloned().collect())
        .unwrap_or_default();
    for client in subscribers {
        state
            .mailboxes
            .entry(client)
            .or_default()
            .push_back(body.clone());
    }
}

/// Poll the mailbox for up to a few seconds, standing in for the real
/// broker's long-poll GET.
fn long_poll(state: &Arc<Mutex<BrokerState>>, client: &str) -> Option<String> {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        {
            let mut state = state.lock().unwrap();
            if let Some(body) = state.mailboxes.get_mut(client).and_then(VecDeque::pop_front) {
                return Some(body);
            }
        }
        if std::time::Instant::now() >= deadline {
            return None;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

fn read_request(stream: &TcpStream) -> Option<(String, String, Option<String>)> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).ok()? == 0 {
        return None;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let uri = parts.next()?.to_string();

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        if line == "\r\n" || line == "\n" {
            break;
        }
        if let Some(rest) = line.strip_prefix("Content-Length: ") {
            content_length = rest.trim().parse().unwrap_or(0);
        }
    }

    let body = if content_length > 0 {
        let mut buf = vec![0u8; content_length];
        reader.read_exact(&mut buf).ok()?;
        Some(String::from_utf8_lossy(&buf).into_owned())
    } else {
        None
    };

    Some((method, uri, body))
}

fn respond_ok(stream: &mut TcpStream, body: Option<String>) {
    match body {
        Some(body) => {
            let _ = write!(
                stream,
                "HTTP/1.0 200 OK\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            );
        }
        None => {
            let _ = write!(stream, "HTTP/1.0 200 OK\r\n\r\n");
        }
    }
}

fn respond_no_content(stream: &mut TcpStream) {
    let _ = write!(stream, "HTTP/1.0 204 No Content\r\n\r\n");
}

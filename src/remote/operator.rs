//! Live operator link.
//!
//! A supervisor thread owns a TCP connection to the operator socket and
//! keeps reconnecting while the process runs. File operations are blocking
//! calls that send one request line and wait for the matching completion;
//! lifecycle and auth-handshake events are pushed to the owner through a
//! channel.
//!
//! Every event carries a sequence number from a counter owned by the
//! supervisor. Rebinding decisions downstream are ordered by it, so a late
//! event can never override a newer one.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Sender, channel};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::wire::{Request, ServerMessage};
use super::{OpDescriptor, RemoteError, RemoteResult};

/// Lifecycle and auth events delivered to the owner of the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorEvent {
    Connected { seq: u64 },
    Accepted { seq: u64 },
    Rejected { seq: u64 },
    Disconnected { seq: u64 },
}

impl OperatorEvent {
    pub fn seq(&self) -> u64 {
        match *self {
            OperatorEvent::Connected { seq }
            | OperatorEvent::Accepted { seq }
            | OperatorEvent::Rejected { seq }
            | OperatorEvent::Disconnected { seq } => seq,
        }
    }
}

/// Handle to the operator link. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct OperatorLink {
    shared: Arc<Shared>,
}

struct Shared {
    /// Write half of the current connection (None while down)
    writer: Mutex<Option<TcpStream>>,
    /// Completion channels for in-flight calls, by request id
    pending: Mutex<HashMap<u64, Sender<RemoteResult<()>>>>,
    next_id: AtomicU64,
    call_timeout: Duration,
}

/// Recover the guard from a poisoned mutex; the protected state stays
/// usable even if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl OperatorLink {
    /// Start the supervisor thread. It connects to `addr`, retries every
    /// `reconnect` while the link is down, and reports events on `events`.
    /// The thread runs for the life of the process; it stops retrying once
    /// the event receiver is gone.
    pub fn spawn(
        addr: String,
        reconnect: Duration,
        call_timeout: Duration,
        events: Sender<OperatorEvent>,
    ) -> Self {
        let shared = Arc::new(Shared {
            writer: Mutex::new(None),
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            call_timeout,
        });

        let supervisor = Arc::clone(&shared);
        thread::spawn(move || {
            let mut seq = 0u64;
            loop {
                match TcpStream::connect(&addr) {
                    Ok(stream) => {
                        info!(%addr, "operator connected");
                        let reader = match stream.try_clone() {
                            Ok(read_half) => read_half,
                            Err(e) => {
                                warn!("could not clone operator stream: {}", e);
                                thread::sleep(reconnect);
                                continue;
                            }
                        };
                        *lock(&supervisor.writer) = Some(stream);

                        seq += 1;
                        if events.send(OperatorEvent::Connected { seq }).is_err() {
                            return;
                        }

                        read_loop(&supervisor, reader, &events, &mut seq);

                        // Connection is gone: drop the writer and fail
                        // everything that was waiting on it.
                        *lock(&supervisor.writer) = None;
                        supervisor.fail_pending();

                        seq += 1;
                        if events.send(OperatorEvent::Disconnected { seq }).is_err() {
                            return;
                        }
                        info!("operator disconnected");
                    }
                    Err(e) => {
                        debug!(%addr, "operator connect failed: {}", e);
                    }
                }
                thread::sleep(reconnect);
            }
        });

        Self { shared }
    }

    /// Send credentials for the handshake. The outcome arrives as an
    /// `Accepted`/`Rejected` event, not as a return value.
    pub fn authenticate(&self, username: &str, password: &str) -> RemoteResult<()> {
        self.shared.send_line(&Request::Auth {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn copy(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.call(|id| Request::copy(id, op))
    }

    pub fn mv(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.call(|id| Request::mv(id, op))
    }

    pub fn remove(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.call(|id| Request::remove(id, op))
    }

    pub fn extract(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.call(|id| Request::extract(id, op))
    }

    pub fn tar(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.call(|id| Request::tar(id, op))
    }

    pub fn zip(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.call(|id| Request::zip(id, op))
    }

    /// Send one request and wait for its completion line.
    fn call(&self, build: impl FnOnce(u64) -> Request) -> RemoteResult<()> {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let request = build(id);

        let (tx, rx) = channel();
        lock(&self.shared.pending).insert(id, tx);

        if let Err(e) = self.shared.send_line(&request) {
            lock(&self.shared.pending).remove(&id);
            return Err(e);
        }

        match rx.recv_timeout(self.shared.call_timeout) {
            Ok(result) => result,
            Err(_) => {
                lock(&self.shared.pending).remove(&id);
                Err(RemoteError::Timeout)
            }
        }
    }
}

impl Shared {
    fn send_line(&self, request: &Request) -> RemoteResult<()> {
        let mut guard = lock(&self.writer);
        let Some(stream) = guard.as_mut() else {
            return Err(RemoteError::Disconnected);
        };
        let mut line = serde_json::to_string(request)
            .map_err(|e| RemoteError::Protocol(e.to_string()))?;
        line.push('\n');
        stream.write_all(line.as_bytes())?;
        Ok(())
    }

    fn complete(&self, id: u64, ok: bool, error: Option<String>) {
        let Some(tx) = lock(&self.pending).remove(&id) else {
            warn!(id, "completion for unknown call");
            return;
        };
        let result = if ok {
            Ok(())
        } else {
            Err(RemoteError::Failed(
                error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        };
        let _ = tx.send(result);
    }

    fn fail_pending(&self) {
        for (_, tx) in lock(&self.pending).drain() {
            let _ = tx.send(Err(RemoteError::Disconnected));
        }
    }
}

/// Read server lines until the connection drops
fn read_loop(
    shared: &Shared,
    stream: TcpStream,
    events: &Sender<OperatorEvent>,
    seq: &mut u64,
) {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {}
            Err(e) => {
                debug!("operator read failed: {}", e);
                return;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<ServerMessage>(trimmed) {
            Ok(ServerMessage::Event { event }) => {
                let parsed = match event.as_str() {
                    "accept" => {
                        *seq += 1;
                        Some(OperatorEvent::Accepted { seq: *seq })
                    }
                    "reject" => {
                        *seq += 1;
                        Some(OperatorEvent::Rejected { seq: *seq })
                    }
                    other => {
                        warn!(event = other, "unknown operator event");
                        None
                    }
                };
                if let Some(event) = parsed
                    && events.send(event).is_err() {
                        return;
                    }
            }
            Ok(ServerMessage::Completion { id, ok, error }) => {
                shared.complete(id, ok, error);
            }
            Err(e) => {
                warn!("bad operator line: {} ({})", trimmed, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc::Receiver;

    const SHORT: Duration = Duration::from_secs(2);

    fn start_link(addr: String) -> (OperatorLink, Receiver<OperatorEvent>) {
        let (tx, rx) = channel();
        let link = OperatorLink::spawn(addr, Duration::from_secs(60), SHORT, tx);
        (link, rx)
    }

    fn wait_for(rx: &Receiver<OperatorEvent>) -> OperatorEvent {
        rx.recv_timeout(Duration::from_secs(5)).expect("no event")
    }

    #[test]
    fn test_call_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let value: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert_eq!(value["op"], "copy");
            let id = value["id"].as_u64().unwrap();
            let mut stream = stream;
            writeln!(stream, r#"{{"id":{},"ok":true}}"#, id).unwrap();
        });

        let (link, rx) = start_link(addr);
        assert!(matches!(wait_for(&rx), OperatorEvent::Connected { .. }));

        let op = OpDescriptor::new("/a", "/b", vec!["x".to_string()]);
        link.copy(&op).unwrap();
        server.join().unwrap();
    }

    #[test]
    fn test_failed_completion() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let value: serde_json::Value = serde_json::from_str(&line).unwrap();
            let id = value["id"].as_u64().unwrap();
            let mut stream = stream;
            writeln!(stream, r#"{{"id":{},"ok":false,"error":"EACCES"}}"#, id).unwrap();
        });

        let (link, rx) = start_link(addr);
        assert!(matches!(wait_for(&rx), OperatorEvent::Connected { .. }));

        let op = OpDescriptor::new("/a", "", vec!["x".to_string()]);
        let err = link.remove(&op).unwrap_err();
        assert!(matches!(err, RemoteError::Failed(msg) if msg == "EACCES"));
        server.join().unwrap();
    }

    #[test]
    fn test_auth_handshake_events() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let value: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert_eq!(value["op"], "auth");
            assert_eq!(value["username"], "root");
            let mut stream = stream;
            writeln!(stream, r#"{{"event":"accept"}}"#).unwrap();
        });

        let (link, rx) = start_link(addr);
        let connected = wait_for(&rx);
        assert!(matches!(connected, OperatorEvent::Connected { .. }));

        link.authenticate("root", "secret").unwrap();
        let accepted = wait_for(&rx);
        assert!(matches!(accepted, OperatorEvent::Accepted { .. }));
        assert!(accepted.seq() > connected.seq());

        server.join().unwrap();
    }

    #[test]
    fn test_disconnect_fails_pending_call() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            // Read the request, then drop the connection without answering
            reader.read_line(&mut line).unwrap();
        });

        let (link, rx) = start_link(addr);
        assert!(matches!(wait_for(&rx), OperatorEvent::Connected { .. }));

        let op = OpDescriptor::new("/a", "/b", Vec::new());
        let err = link.mv(&op).unwrap_err();
        assert!(matches!(err, RemoteError::Disconnected));
        assert!(matches!(wait_for(&rx), OperatorEvent::Disconnected { .. }));
        server.join().unwrap();
    }

    #[test]
    fn test_call_while_down() {
        // Bind then drop so the port refuses connections
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let (link, _rx) = start_link(addr);
        let op = OpDescriptor::new("/a", "/b", Vec::new());
        let err = link.zip(&op).unwrap_err();
        assert!(matches!(err, RemoteError::Disconnected));
    }
}

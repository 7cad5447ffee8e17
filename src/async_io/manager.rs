//! Background I/O manager using a worker thread and channels.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use crate::async_io::{IoRequest, IoResponse};

/// Runs listing fetches on a dedicated thread.
///
/// Requests are sent via `send()` and responses are polled via `try_recv()`.
/// The worker terminates when the IoManager is dropped and its request
/// channel closes.
pub struct IoManager {
    tx: Sender<IoRequest>,
    rx: Receiver<IoResponse>,
}

impl IoManager {
    /// Create a new IoManager with a background worker thread.
    #[must_use]
    pub fn new() -> Self {
        let (req_tx, req_rx) = channel::<IoRequest>();
        let (res_tx, res_rx) = channel::<IoResponse>();

        thread::spawn(move || {
            while let Ok(request) = req_rx.recv() {
                handle_request(request, &res_tx);
            }
        });

        Self {
            tx: req_tx,
            rx: res_rx,
        }
    }

    /// Send a request to the background worker.
    pub fn send(&self, req: IoRequest) {
        // Send errors only occur if the worker exited; nothing to do then.
        let _ = self.tx.send(req);
    }

    /// Try to receive a response without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<IoResponse> {
        self.rx.try_recv().ok()
    }
}

impl Default for IoManager {
    fn default() -> Self {
        Self::new()
    }
}

fn handle_request(req: IoRequest, tx: &Sender<IoResponse>) {
    match req {
        IoRequest::List(side, path, client) => match client.list(&path) {
            Ok(listing) => {
                let _ = tx.send(IoResponse::Listed(side, listing));
            }
            Err(e) => {
                let _ = tx.send(IoResponse::Error(side, path, e.to_string()));
            }
        },
    }
}

//! Background execution of file operations
//!
//! An operation captures the currently bound transport once, runs on its
//! own thread, and reports completion over a channel that the event loop
//! polls. There is no cancellation: a call that went out runs to
//! completion or failure.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::config::PackFormat;
use crate::remote::{OpDescriptor, RemoteResult};
use crate::state::panel::PendingSelect;
use crate::transport::Transport;

/// The transport call an operation maps to
#[derive(Debug, Clone)]
pub enum OpCall {
    Copy(OpDescriptor),
    Move(OpDescriptor),
    Remove(OpDescriptor),
    Extract(OpDescriptor),
    Pack(PackFormat, OpDescriptor),
}

impl OpCall {
    /// Progress dialog title
    pub fn title(&self) -> &'static str {
        match self {
            OpCall::Copy(_) => "Copying",
            OpCall::Move(_) => "Moving",
            OpCall::Remove(_) => "Deleting",
            OpCall::Extract(_) => "Extracting",
            OpCall::Pack(..) => "Packing",
        }
    }
}

/// How the UI recovers once the operation succeeded.
/// A failed operation performs no refresh at all.
#[derive(Debug, Clone)]
pub struct RefreshPlan {
    /// Refresh the inactive panel too (dual-panel transfers)
    pub passive: bool,
    /// Focus to restore in the active panel after its listing lands
    pub select: PendingSelect,
}

/// Completion report from the worker thread
pub struct OpOutcome {
    pub result: RemoteResult<()>,
    pub refresh: RefreshPlan,
}

/// A file operation running on a background thread
pub struct OpTask {
    receiver: Receiver<OpOutcome>,
    _handle: JoinHandle<()>,
}

impl OpTask {
    /// Run `call` against `transport` on a background thread.
    ///
    /// The transport set was captured by the caller; rebinds that happen
    /// while this runs do not affect it.
    pub fn spawn(transport: Arc<dyn Transport>, call: OpCall, refresh: RefreshPlan) -> Self {
        let (tx, rx) = channel::<OpOutcome>();

        let handle = thread::spawn(move || {
            debug!(?call, "running file operation");
            let result = match &call {
                OpCall::Copy(op) => transport.copy(op),
                OpCall::Move(op) => transport.mv(op),
                OpCall::Remove(op) => transport.remove(op),
                OpCall::Extract(op) => transport.extract(op),
                OpCall::Pack(PackFormat::Zip, op) => transport.pack_zip(op),
                OpCall::Pack(PackFormat::Tar, op) => transport.pack_tar(op),
            };
            if let Err(ref e) = result {
                warn!("file operation failed: {}", e);
            }
            let _ = tx.send(OpOutcome { result, refresh });
        });

        OpTask {
            receiver: rx,
            _handle: handle,
        }
    }

    /// Check for completion without blocking
    pub fn try_recv(&self) -> Option<OpOutcome> {
        self.receiver.try_recv().ok()
    }
}

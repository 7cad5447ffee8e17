//! Transport capability bindings for file operations
//!
//! A transport is the full set of six capabilities an operation can be
//! dispatched through. Exactly one set is bound at a time; the registry
//! swaps the whole set in one step, so a caller always sees either the
//! live-operator set or the REST set, never a mix.

mod live;
mod rest;
mod selector;

pub use live::LiveTransport;
pub use rest::RestTransport;
pub use selector::{AuthChannel, LinkState, TransportSelector};

use std::sync::{Arc, RwLock};

use crate::remote::{OpDescriptor, RemoteResult};

/// The six file-operation capabilities.
///
/// Each takes an operation descriptor and blocks until the remote side
/// reports completion. Errors pass through unmodified; no retries here.
pub trait Transport: Send + Sync {
    fn copy(&self, op: &OpDescriptor) -> RemoteResult<()>;
    fn mv(&self, op: &OpDescriptor) -> RemoteResult<()>;
    fn remove(&self, op: &OpDescriptor) -> RemoteResult<()>;
    fn extract(&self, op: &OpDescriptor) -> RemoteResult<()>;
    fn pack_zip(&self, op: &OpDescriptor) -> RemoteResult<()>;
    fn pack_tar(&self, op: &OpDescriptor) -> RemoteResult<()>;
}

struct Bound {
    seq: u64,
    transport: Arc<dyn Transport>,
}

/// Holds the currently bound capability set.
///
/// Swaps are ordered by the sequence number of the event that caused them;
/// a bind carrying a stale sequence is ignored, which makes racing
/// connect/disconnect rebinds deterministic (last event wins).
pub struct TransportRegistry {
    inner: RwLock<Bound>,
}

impl TransportRegistry {
    pub fn new(initial: Arc<dyn Transport>) -> Self {
        Self {
            inner: RwLock::new(Bound {
                seq: 0,
                transport: initial,
            }),
        }
    }

    /// Install a full capability set. Returns false when `seq` is not newer
    /// than the last applied bind.
    pub fn bind(&self, seq: u64, transport: Arc<dyn Transport>) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if seq <= inner.seq {
            return false;
        }
        inner.seq = seq;
        inner.transport = transport;
        true
    }

    /// The currently bound set. An operation captures this once at
    /// dispatch; later rebinds do not affect calls already in flight.
    pub fn current(&self) -> Arc<dyn Transport> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&inner.transport)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Transport that records which capability was invoked
    pub struct RecordingTransport {
        /// Shown in assertion failures when sets get mixed up
        pub label: &'static str,
        pub calls: Mutex<Vec<String>>,
    }

    impl RecordingTransport {
        pub fn new(label: &'static str) -> Self {
            Self {
                label,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, capability: &str) -> RemoteResult<()> {
            self.calls.lock().unwrap().push(capability.to_string());
            Ok(())
        }
    }

    impl std::fmt::Debug for RecordingTransport {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "RecordingTransport({})", self.label)
        }
    }

    impl Transport for RecordingTransport {
        fn copy(&self, _op: &OpDescriptor) -> RemoteResult<()> {
            self.record("copy")
        }
        fn mv(&self, _op: &OpDescriptor) -> RemoteResult<()> {
            self.record("mv")
        }
        fn remove(&self, _op: &OpDescriptor) -> RemoteResult<()> {
            self.record("remove")
        }
        fn extract(&self, _op: &OpDescriptor) -> RemoteResult<()> {
            self.record("extract")
        }
        fn pack_zip(&self, _op: &OpDescriptor) -> RemoteResult<()> {
            self.record("pack_zip")
        }
        fn pack_tar(&self, _op: &OpDescriptor) -> RemoteResult<()> {
            self.record("pack_tar")
        }
    }
}

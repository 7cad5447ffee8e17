//! REST-backed capability set, the default binding

use std::sync::Arc;

use super::Transport;
use crate::remote::{OpDescriptor, RemoteResult, RestClient};

pub struct RestTransport {
    client: Arc<RestClient>,
}

impl RestTransport {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

impl Transport for RestTransport {
    fn copy(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.client.copy(op)
    }

    fn mv(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.client.mv(op)
    }

    fn remove(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.client.delete(&op.from, &op.names)
    }

    fn extract(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.client.extract(op)
    }

    // The REST endpoint is format-agnostic; both pack capabilities land on
    // the same call and the server derives the format from the destination.
    fn pack_zip(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.client.pack(op)
    }

    fn pack_tar(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.client.pack(op)
    }
}

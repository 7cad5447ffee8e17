//! Operator-backed capability set, bound while the link is authenticated

use super::Transport;
use crate::remote::{OpDescriptor, OperatorLink, RemoteResult};

pub struct LiveTransport {
    link: OperatorLink,
}

impl LiveTransport {
    pub fn new(link: OperatorLink) -> Self {
        Self { link }
    }
}

impl Transport for LiveTransport {
    fn copy(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.link.copy(op)
    }

    fn mv(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.link.mv(op)
    }

    fn remove(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.link.remove(op)
    }

    fn extract(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.link.extract(op)
    }

    fn pack_zip(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.link.zip(op)
    }

    fn pack_tar(&self, op: &OpDescriptor) -> RemoteResult<()> {
        self.link.tar(op)
    }
}

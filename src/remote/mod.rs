//! Remote server access
//!
//! Everything the client knows about the server lives here:
//! - REST endpoints for listings and the fallback file operations
//! - the live operator link used for file operations when connected
//!
//! All paths exchanged with the server are `/`-rooted strings.

mod operator;
mod rest;
mod wire;

pub use operator::{OperatorEvent, OperatorLink};
pub use rest::RestClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for remote operations
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("operation failed: {0}")]
    Failed(String),
    #[error("operator link is down")]
    Disconnected,
    #[error("operation timed out")]
    Timeout,
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Describes one copy/move/delete/pack/extract request.
///
/// `names` lists the entries under `from` the operation applies to; the
/// dispatcher substitutes the focused entry before a transport ever sees an
/// empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpDescriptor {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub names: Vec<String>,
}

impl OpDescriptor {
    pub fn new(from: impl Into<String>, to: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            names,
        }
    }
}

/// Kind of a listed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// A single entry in a directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub kind: EntryKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: Option<String>,
}

impl RemoteEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A directory listing as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub path: String,
    pub files: Vec<RemoteEntry>,
}

/// Join a remote directory path and an entry name
pub fn join_remote(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Parent of a remote path, or None at the root
pub fn parent_remote(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(trimmed[..idx].to_string()),
        None => None,
    }
}

/// Last component of a remote path ("/" yields "/")
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

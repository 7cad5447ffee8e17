//! Line protocol spoken over the operator link.
//!
//! Each line is one JSON object. The client sends requests tagged by `op`;
//! the server answers operations with `{id, ok, error?}` completions and
//! pushes untagged `{event}` lines for the auth handshake.

use serde::{Deserialize, Serialize};

use super::OpDescriptor;

/// Client -> server request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    Auth {
        username: String,
        password: String,
    },
    Copy {
        id: u64,
        from: String,
        to: String,
        names: Vec<String>,
    },
    Move {
        id: u64,
        from: String,
        to: String,
        names: Vec<String>,
    },
    Remove {
        id: u64,
        from: String,
        names: Vec<String>,
    },
    Extract {
        id: u64,
        from: String,
        to: String,
    },
    Tar {
        id: u64,
        from: String,
        to: String,
        names: Vec<String>,
    },
    Zip {
        id: u64,
        from: String,
        to: String,
        names: Vec<String>,
    },
}

impl Request {
    pub fn copy(id: u64, op: &OpDescriptor) -> Self {
        Request::Copy {
            id,
            from: op.from.clone(),
            to: op.to.clone(),
            names: op.names.clone(),
        }
    }

    pub fn mv(id: u64, op: &OpDescriptor) -> Self {
        Request::Move {
            id,
            from: op.from.clone(),
            to: op.to.clone(),
            names: op.names.clone(),
        }
    }

    pub fn remove(id: u64, op: &OpDescriptor) -> Self {
        Request::Remove {
            id,
            from: op.from.clone(),
            names: op.names.clone(),
        }
    }

    pub fn extract(id: u64, op: &OpDescriptor) -> Self {
        Request::Extract {
            id,
            from: op.from.clone(),
            to: op.to.clone(),
        }
    }

    pub fn tar(id: u64, op: &OpDescriptor) -> Self {
        Request::Tar {
            id,
            from: op.from.clone(),
            to: op.to.clone(),
            names: op.names.clone(),
        }
    }

    pub fn zip(id: u64, op: &OpDescriptor) -> Self {
        Request::Zip {
            id,
            from: op.from.clone(),
            to: op.to.clone(),
            names: op.names.clone(),
        }
    }
}

/// Server -> client line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// Auth handshake outcome: "accept" or "reject"
    Event { event: String },
    /// Completion of an operation
    Completion {
        id: u64,
        ok: bool,
        #[serde(default)]
        error: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tagging() {
        let op = OpDescriptor::new("/a", "/b", vec!["x".to_string()]);
        let line = serde_json::to_string(&Request::copy(7, &op)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["op"], "copy");
        assert_eq!(value["id"], 7);
        assert_eq!(value["from"], "/a");
        assert_eq!(value["names"][0], "x");
    }

    #[test]
    fn test_remove_has_no_destination() {
        let op = OpDescriptor::new("/a", "", vec!["x".to_string()]);
        let line = serde_json::to_string(&Request::remove(1, &op)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["op"], "remove");
        assert!(value.get("to").is_none());
    }

    #[test]
    fn test_server_message_event() {
        let msg: ServerMessage = serde_json::from_str(r#"{"event":"accept"}"#).unwrap();
        match msg {
            ServerMessage::Event { event } => assert_eq!(event, "accept"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_server_message_completion() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"id":3,"ok":false,"error":"EACCES"}"#).unwrap();
        match msg {
            ServerMessage::Completion { id, ok, error } => {
                assert_eq!(id, 3);
                assert!(!ok);
                assert_eq!(error.as_deref(), Some("EACCES"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}

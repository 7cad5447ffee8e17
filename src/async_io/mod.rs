//! Background directory listing fetches.
//!
//! Listings come over REST and can take a while on a slow link; fetching
//! them on a worker thread keeps the UI loop responsive. Requests go in
//! through a channel and responses are polled from the event loop.

pub mod manager;

use std::sync::Arc;

use crate::remote::{Listing, RestClient};
use crate::state::Side;

/// Request for a background fetch
pub enum IoRequest {
    /// List a directory: (target panel, path, client)
    List(Side, String, Arc<RestClient>),
}

impl std::fmt::Debug for IoRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoRequest::List(side, path, _) => f
                .debug_tuple("List")
                .field(side)
                .field(path)
                .field(&"<client>")
                .finish(),
        }
    }
}

/// Response from a background fetch
#[derive(Debug)]
pub enum IoResponse {
    /// Listing completed successfully
    Listed(Side, Listing),
    /// Fetch failed: (target panel, path, error message)
    Error(Side, String, String),
}

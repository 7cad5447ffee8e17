//! REST client: directory listings and the fallback file operations.
//!
//! Every call is a plain request/response against the server's API with
//! basic auth. This is the transport file operations fall back to whenever
//! the operator link is down, and the only way listings are fetched.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use super::{Listing, OpDescriptor, RemoteError, RemoteResult};

pub struct RestClient {
    http: reqwest::blocking::Client,
    base: String,
    username: String,
    password: String,
}

impl RestClient {
    /// Build a client for the given base URL (no trailing slash needed).
    pub fn new(
        base: &str,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> RemoteResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v1/{}", self.base, endpoint)
    }

    fn fs_url(&self, path: &str) -> String {
        format!("{}/api/v1/fs{}", self.base, encode_path(path))
    }

    /// Check the response status, turning non-2xx into an error that
    /// carries the server's message.
    fn check(resp: reqwest::blocking::Response) -> RemoteResult<reqwest::blocking::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().unwrap_or_default();
        Err(RemoteError::Status {
            code: status.as_u16(),
            message,
        })
    }

    /// Fetch the listing of a directory
    pub fn list(&self, path: &str) -> RemoteResult<Listing> {
        debug!(path, "rest list");
        let resp = self
            .http
            .get(self.fs_url(path))
            .basic_auth(&self.username, Some(&self.password))
            .send()?;
        let listing = Self::check(resp)?.json::<Listing>()?;
        Ok(listing)
    }

    /// Copy `names` from one directory to another
    pub fn copy(&self, op: &OpDescriptor) -> RemoteResult<()> {
        debug!(from = %op.from, to = %op.to, "rest copy");
        self.operation("copy", op)
    }

    /// Move `names` from one directory to another
    pub fn mv(&self, op: &OpDescriptor) -> RemoteResult<()> {
        debug!(from = %op.from, to = %op.to, "rest move");
        self.operation("move", op)
    }

    /// Delete `names` under the given directory
    pub fn delete(&self, from: &str, names: &[String]) -> RemoteResult<()> {
        debug!(from, count = names.len(), "rest delete");
        let resp = self
            .http
            .delete(self.fs_url(from))
            .basic_auth(&self.username, Some(&self.password))
            .json(&json!({ "names": names }))
            .send()?;
        Self::check(resp)?;
        Ok(())
    }

    /// Extract the archive at `from` into the directory `to`
    pub fn extract(&self, op: &OpDescriptor) -> RemoteResult<()> {
        debug!(from = %op.from, to = %op.to, "rest extract");
        self.operation("extract", op)
    }

    /// Pack `names` into the archive at `to`. The REST endpoint picks the
    /// format from the destination extension; the operator link has
    /// separate tar/zip calls instead.
    pub fn pack(&self, op: &OpDescriptor) -> RemoteResult<()> {
        debug!(from = %op.from, to = %op.to, "rest pack");
        self.operation("pack", op)
    }

    fn operation(&self, endpoint: &str, op: &OpDescriptor) -> RemoteResult<()> {
        let resp = self
            .http
            .put(self.url(endpoint))
            .basic_auth(&self.username, Some(&self.password))
            .json(op)
            .send()?;
        Self::check(resp)?;
        Ok(())
    }
}

/// Percent-encode a remote path for use in a URL, leaving `/` intact.
fn encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{:02X}", byte));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("/a/b.txt"), "/a/b.txt");
        assert_eq!(encode_path("/my docs"), "/my%20docs");
        assert_eq!(encode_path("/a#b"), "/a%23b");
    }

    /// Serve one request from a tiny_http server, asserting on it and
    /// responding with `status`/`body`.
    fn serve_one(
        server: tiny_http::Server,
        status: u16,
        body: &'static str,
        assert_req: impl FnOnce(&tiny_http::Request) + Send + 'static,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let request = server.recv().unwrap();
            assert_req(&request);
            let response = tiny_http::Response::from_string(body).with_status_code(status);
            request.respond(response).unwrap();
        })
    }

    fn client_for(server: &tiny_http::Server) -> RestClient {
        let base = format!("http://{}", server.server_addr());
        RestClient::new(&base, "root", "secret", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_list() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let client = client_for(&server);
        let handle = serve_one(
            server,
            200,
            r#"{"path":"/","files":[{"name":"a","kind":"file","size":1}]}"#,
            |req| {
                assert_eq!(req.url(), "/api/v1/fs/");
                // basic auth must be present on every call
                assert!(req
                    .headers()
                    .iter()
                    .any(|h| h.field.equiv("Authorization")));
            },
        );

        let listing = client.list("/").unwrap();
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].name, "a");
        handle.join().unwrap();
    }

    #[test]
    fn test_copy_sends_descriptor() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let client = client_for(&server);
        let handle = serve_one(server, 200, "", |req| {
            assert_eq!(req.url(), "/api/v1/copy");
        });

        let op = OpDescriptor::new("/a", "/b", vec!["x".to_string()]);
        client.copy(&op).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_error_status_carries_message() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let client = client_for(&server);
        let handle = serve_one(server, 404, "no such directory", |_| {});

        let err = client.list("/missing").unwrap_err();
        match err {
            RemoteError::Status { code, message } => {
                assert_eq!(code, 404);
                assert_eq!(message, "no such directory");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        handle.join().unwrap();
    }
}

//! Transport selector: the link state machine that swaps capability sets.
//!
//! States follow the operator lifecycle:
//!
//! ```text
//! Disconnected -> Authenticating -> Connected
//!       ^               |               |
//!       +---------------+---------------+
//! ```
//!
//! REST is the default binding; the live set is installed only after the
//! server accepts the credentials. A rejected handshake leaves REST bound
//! and counts as Disconnected for selection purposes, even though the TCP
//! link itself may stay up.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Transport, TransportRegistry};
use crate::remote::{OperatorEvent, OperatorLink, RemoteResult};

/// Where the operator link currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Authenticating,
    Connected,
}

/// Sends the credential handshake over the link.
/// Split out so the selector can be driven by a stub in tests.
pub trait AuthChannel: Send {
    fn send_credentials(&self, username: &str, password: &str) -> RemoteResult<()>;
}

impl AuthChannel for OperatorLink {
    fn send_credentials(&self, username: &str, password: &str) -> RemoteResult<()> {
        self.authenticate(username, password)
    }
}

pub struct TransportSelector {
    registry: Arc<TransportRegistry>,
    rest: Arc<dyn Transport>,
    live: Arc<dyn Transport>,
    auth: Box<dyn AuthChannel>,
    username: String,
    password: String,
    state: LinkState,
    last_seq: u64,
}

impl TransportSelector {
    pub fn new(
        registry: Arc<TransportRegistry>,
        rest: Arc<dyn Transport>,
        live: Arc<dyn Transport>,
        auth: Box<dyn AuthChannel>,
        username: String,
        password: String,
    ) -> Self {
        Self {
            registry,
            rest,
            live,
            auth,
            username,
            password,
            state: LinkState::Disconnected,
            last_seq: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Apply one operator event. Rebinding happens inside this call, so by
    /// the time it returns the registry already holds the new set.
    /// Returns an alert message to surface to the user, if any.
    pub fn handle_event(&mut self, event: OperatorEvent) -> Option<&'static str> {
        let seq = event.seq();
        if seq <= self.last_seq {
            debug!(seq, last = self.last_seq, "stale operator event ignored");
            return None;
        }
        self.last_seq = seq;

        match event {
            OperatorEvent::Connected { .. } => {
                self.state = LinkState::Authenticating;
                if let Err(e) = self.auth.send_credentials(&self.username, &self.password) {
                    // The link will drop and retry on its own; nothing to do
                    warn!("could not send credentials: {}", e);
                }
                None
            }
            OperatorEvent::Accepted { seq } => {
                self.state = LinkState::Connected;
                self.registry.bind(seq, Arc::clone(&self.live));
                info!("operator accepted credentials, live transport bound");
                None
            }
            OperatorEvent::Rejected { .. } => {
                self.state = LinkState::Disconnected;
                warn!("operator rejected credentials, staying on rest transport");
                Some("Wrong credentials!")
            }
            OperatorEvent::Disconnected { seq } => {
                self.state = LinkState::Disconnected;
                self.registry.bind(seq, Arc::clone(&self.rest));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_support::RecordingTransport;
    use std::sync::Mutex;

    struct StubAuth {
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl AuthChannel for StubAuth {
        fn send_credentials(&self, username: &str, password: &str) -> RemoteResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push((username.to_string(), password.to_string()));
            Ok(())
        }
    }

    fn make_selector() -> (
        TransportSelector,
        Arc<TransportRegistry>,
        Arc<dyn Transport>,
        Arc<dyn Transport>,
        Arc<Mutex<Vec<(String, String)>>>,
    ) {
        let rest: Arc<dyn Transport> = Arc::new(RecordingTransport::new("rest"));
        let live: Arc<dyn Transport> = Arc::new(RecordingTransport::new("live"));
        let registry = Arc::new(TransportRegistry::new(Arc::clone(&rest)));
        let sent = Arc::new(Mutex::new(Vec::new()));
        let auth = Box::new(StubAuth {
            sent: Arc::clone(&sent),
        });
        let selector = TransportSelector::new(
            Arc::clone(&registry),
            Arc::clone(&rest),
            Arc::clone(&live),
            auth,
            "root".to_string(),
            "secret".to_string(),
        );
        (selector, registry, rest, live, sent)
    }

    #[test]
    fn test_connect_sends_credentials_but_keeps_rest() {
        let (mut selector, registry, rest, _live, sent) = make_selector();

        assert!(selector.handle_event(OperatorEvent::Connected { seq: 1 }).is_none());
        assert_eq!(selector.state(), LinkState::Authenticating);
        assert_eq!(
            sent.lock().unwrap().as_slice(),
            &[("root".to_string(), "secret".to_string())]
        );
        // Bindings stay at the REST default until accept
        assert!(Arc::ptr_eq(&registry.current(), &rest));
    }

    #[test]
    fn test_accept_binds_live() {
        let (mut selector, registry, _rest, live, _sent) = make_selector();

        selector.handle_event(OperatorEvent::Connected { seq: 1 });
        selector.handle_event(OperatorEvent::Accepted { seq: 2 });
        assert_eq!(selector.state(), LinkState::Connected);
        assert!(Arc::ptr_eq(&registry.current(), &live));
    }

    #[test]
    fn test_reject_alerts_and_keeps_rest() {
        let (mut selector, registry, rest, _live, _sent) = make_selector();

        selector.handle_event(OperatorEvent::Connected { seq: 1 });
        let alert = selector.handle_event(OperatorEvent::Rejected { seq: 2 });
        assert_eq!(alert, Some("Wrong credentials!"));
        assert_eq!(selector.state(), LinkState::Disconnected);
        assert!(Arc::ptr_eq(&registry.current(), &rest));
    }

    #[test]
    fn test_disconnect_reverts_to_rest_in_same_turn() {
        let (mut selector, registry, rest, live, _sent) = make_selector();

        selector.handle_event(OperatorEvent::Connected { seq: 1 });
        selector.handle_event(OperatorEvent::Accepted { seq: 2 });
        assert!(Arc::ptr_eq(&registry.current(), &live));

        // By the time handle_event returns, all six capabilities are REST
        // again; there is no intermediate state to observe.
        selector.handle_event(OperatorEvent::Disconnected { seq: 3 });
        assert_eq!(selector.state(), LinkState::Disconnected);
        assert!(Arc::ptr_eq(&registry.current(), &rest));
    }

    #[test]
    fn test_stale_events_are_dropped() {
        let (mut selector, registry, _rest, live, sent) = make_selector();

        selector.handle_event(OperatorEvent::Connected { seq: 3 });
        selector.handle_event(OperatorEvent::Accepted { seq: 4 });

        // A disconnect that was queued before the connect must not rebind
        selector.handle_event(OperatorEvent::Disconnected { seq: 2 });
        assert_eq!(selector.state(), LinkState::Connected);
        assert!(Arc::ptr_eq(&registry.current(), &live));

        // Stale connect does not re-send credentials either
        selector.handle_event(OperatorEvent::Connected { seq: 1 });
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_reconnect_cycle() {
        let (mut selector, registry, rest, live, sent) = make_selector();

        selector.handle_event(OperatorEvent::Connected { seq: 1 });
        selector.handle_event(OperatorEvent::Accepted { seq: 2 });
        selector.handle_event(OperatorEvent::Disconnected { seq: 3 });
        selector.handle_event(OperatorEvent::Connected { seq: 4 });
        assert_eq!(selector.state(), LinkState::Authenticating);
        assert_eq!(sent.lock().unwrap().len(), 2);
        assert!(Arc::ptr_eq(&registry.current(), &rest));

        selector.handle_event(OperatorEvent::Accepted { seq: 5 });
        assert!(Arc::ptr_eq(&registry.current(), &live));
    }
}

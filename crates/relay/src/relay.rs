//! Message relay: forwards payloads to the receiver's live session.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use crate::events::{MessagePayload, ServerEvent};
use crate::presence::{PresenceRegistry, SessionId};

/// Outcome of routing a single message through the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The payload was handed to the receiver's live session.
    Delivered,
    /// The receiver has no live session; the message was dropped from the
    /// real-time path.
    ReceiverOffline,
}

/// Routes messages between connected sessions.
///
/// The relay owns the presence registry and one outbound queue per attached
/// session. Routing is stateless per message: look up the receiver, forward
/// verbatim if a live session exists, report `ReceiverOffline` otherwise.
/// No retries, no queuing for offline receivers, no acknowledgement back to
/// the sender.
pub struct MessageRelay {
    registry: PresenceRegistry,
    sessions: RwLock<HashMap<SessionId, mpsc::Sender<ServerEvent>>>,
    session_buffer: usize,
}

impl MessageRelay {
    pub fn new(session_buffer: usize) -> Arc<Self> {
        Arc::new(Self {
            registry: PresenceRegistry::new(),
            sessions: RwLock::new(HashMap::new()),
            session_buffer: session_buffer.max(1),
        })
    }

    pub fn registry(&self) -> &PresenceRegistry {
        &self.registry
    }

    /// Attach a new transport session and hand back the receiving end of
    /// its outbound queue. Called once per connection, before any events
    /// are processed.
    pub async fn attach(&self, session_id: SessionId) -> mpsc::Receiver<ServerEvent> {
        let (tx, rx) = mpsc::channel(self.session_buffer);
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, tx);
        rx
    }

    /// Drop a session's outbound queue. Subsequent routes to this session
    /// report the receiver as offline.
    pub async fn detach(&self, session_id: &SessionId) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
    }

    /// Handle a `join`: record the session as the user's current one.
    pub async fn join(&self, user_id: &str, session_id: &SessionId) {
        debug!(user_id, session = %session_id, "user joined relay");
        self.registry.register(user_id, session_id.clone()).await;
    }

    /// Disconnect cleanup for one identity joined on `session_id`.
    pub async fn leave(&self, user_id: &str, session_id: &SessionId) {
        debug!(user_id, session = %session_id, "user left relay");
        self.registry.unregister(user_id, session_id).await;
    }

    /// Route a message to its receiver's live session, if any.
    ///
    /// A registry entry pointing at a detached or closed session is stale:
    /// it is pruned and the route reports `ReceiverOffline`.
    pub async fn route(&self, message: MessagePayload) -> RouteOutcome {
        let receiver_id = message.receiver_id.clone();

        let Some(session_id) = self.registry.lookup(&receiver_id).await else {
            debug!(receiver_id, "receiver has not joined, dropping message");
            return RouteOutcome::ReceiverOffline;
        };

        let tx = {
            let sessions = self.sessions.read().await;
            sessions.get(&session_id).cloned()
        };

        let Some(tx) = tx else {
            warn!(receiver_id, session = %session_id, "stale presence entry, pruning");
            self.registry.unregister(&receiver_id, &session_id).await;
            return RouteOutcome::ReceiverOffline;
        };

        if tx.send(ServerEvent::ReceiveMessage { message }).await.is_err() {
            warn!(receiver_id, session = %session_id, "session queue closed, pruning");
            self.detach(&session_id).await;
            self.registry.unregister(&receiver_id, &session_id).await;
            return RouteOutcome::ReceiverOffline;
        }

        debug!(receiver_id, session = %session_id, "message delivered to live session");
        RouteOutcome::Delivered
    }
}

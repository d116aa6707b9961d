//! Presence registry: user identifier to live session identifier.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

/// Opaque identifier for one live transport connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-wide mapping from user identifier to the user's current session.
///
/// At most one entry exists per user; a later `register` overwrites an
/// earlier one, so multi-device fan-out is unsupported by construction.
/// Created at process start and owned by the gateway state, not ambient
/// global state.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    inner: Arc<RwLock<HashMap<String, SessionId>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `session_id` as the current session for `user_id`,
    /// unconditionally overwriting any prior entry.
    pub async fn register(&self, user_id: &str, session_id: SessionId) {
        let mut entries = self.inner.write().await;
        entries.insert(user_id.to_string(), session_id);
    }

    /// Current session for `user_id`, if the user has joined.
    pub async fn lookup(&self, user_id: &str) -> Option<SessionId> {
        let entries = self.inner.read().await;
        entries.get(user_id).cloned()
    }

    /// Remove the entry for `user_id`, but only if it still maps to
    /// `session_id`. A rejoin from a newer session must not be clobbered
    /// by the old session's disconnect.
    pub async fn unregister(&self, user_id: &str, session_id: &SessionId) {
        let mut entries = self.inner.write().await;
        if entries.get(user_id) == Some(session_id) {
            entries.remove(user_id);
        }
    }
}

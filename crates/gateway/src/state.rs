//! Shared application state for the gateway

use std::sync::Arc;

use mentorlink_config::{RelayConfig, StorageConfig};
use mentorlink_database::{ConnectionRepository, MessageRepository, ProfileRepository};
use mentorlink_relay::MessageRelay;
use sqlx::SqlitePool;

/// Shared state behind every gateway route.
///
/// The relay lives here with an injected lifecycle: created when the state
/// is built at process start, dropped at shutdown. There is no ambient
/// global registry.
#[derive(Clone)]
pub struct GatewayState {
    pub pool: SqlitePool,
    pub relay: Arc<MessageRelay>,
    pub storage: StorageConfig,
    pub profiles: Arc<ProfileRepository>,
    pub messages: Arc<MessageRepository>,
    pub connections: Arc<ConnectionRepository>,
}

impl GatewayState {
    pub fn new(pool: SqlitePool, storage: StorageConfig, relay_config: &RelayConfig) -> Self {
        let relay = MessageRelay::new(relay_config.session_buffer);
        Self {
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool.clone())),
            connections: Arc::new(ConnectionRepository::new(pool.clone())),
            relay,
            storage,
            pool,
        }
    }

    /// Resolve a stored object path into a public URL.
    pub fn public_object_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.storage.public_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

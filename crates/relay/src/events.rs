//! Wire-level event types for the relay WebSocket contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A chat message as it travels through the relay.
///
/// Routing needs only `receiver_id`. Every other field — sender, content,
/// persisted id, whatever a client attaches — is captured in `extra` and
/// re-emitted unchanged on the receiver side. The relay does not validate
/// message shape: a payload with no content, or content of an unexpected
/// type, is forwarded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub receiver_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessagePayload {
    pub fn new(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut extra = Map::new();
        extra.insert("sender_id".to_string(), Value::String(sender_id.into()));
        extra.insert("content".to_string(), Value::String(content.into()));
        Self {
            receiver_id: receiver_id.into(),
            extra,
        }
    }
}

/// Events received from a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Announce which user this session belongs to. No response.
    Join { user_id: String },
    /// Relay a message to its receiver. No acknowledgement.
    SendMessage { message: MessagePayload },
}

/// Events sent to a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message routed to this session, same shape as it was sent.
    ReceiveMessage { message: MessagePayload },
}

//! Message entity definitions

use serde::{Deserialize, Serialize};

/// A durably stored chat message. The real-time relay passes payloads by
/// value and never owns them; once stored, a message gains a public id and
/// a creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub public_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

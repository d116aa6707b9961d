//! Connection entity definitions
//!
//! A connection is an accepted mentor/student pairing; it authorizes chat
//! at the product level but is never consulted by the relay.

use serde::{Deserialize, Serialize};

use super::profile::Profile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: i64,
    pub public_id: String,
    pub mentor_id: String,
    pub student_id: String,
    pub status: ConnectionStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// A connection joined to the other participant's profile, from the point
/// of view of one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionWithPartner {
    pub connection: Connection,
    pub partner: Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConnectionRequest {
    pub mentor_id: String,
    pub student_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
        }
    }
}

impl From<&str> for ConnectionStatus {
    fn from(value: &str) -> Self {
        match value {
            "accepted" => ConnectionStatus::Accepted,
            "rejected" => ConnectionStatus::Rejected,
            _ => ConnectionStatus::Pending,
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

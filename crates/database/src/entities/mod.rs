//! Domain entities for the storage layer

pub mod connection;
pub mod message;
pub mod profile;

pub use connection::{Connection, ConnectionStatus, ConnectionWithPartner, CreateConnectionRequest};
pub use message::{CreateMessageRequest, StoredMessage};
pub use profile::{CreateProfileRequest, Profile, ProfileRole};

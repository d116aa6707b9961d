//! Mentorlink Database Crate
//!
//! Durable storage for the chat platform: profiles, mentor/student
//! connections, and message history. The relay never touches this crate;
//! durability and querying live entirely on this side of the seam.

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::{ConnectionRepository, MessageRepository, ProfileRepository};

pub use entities::{
    connection::{Connection, ConnectionStatus, ConnectionWithPartner, CreateConnectionRequest},
    message::{CreateMessageRequest, StoredMessage},
    profile::{CreateProfileRequest, Profile, ProfileRole},
};

pub use types::{StoreError, StoreResult};

use mentorlink_config::DatabaseConfig;
use sqlx::SqlitePool;

/// Connect to the database and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let pool = prepare_database(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

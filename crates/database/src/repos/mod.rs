//! Database repository implementations

pub mod connection_repository;
pub mod message_repository;
pub mod profile_repository;

pub use connection_repository::ConnectionRepository;
pub use message_repository::MessageRepository;
pub use profile_repository::ProfileRepository;

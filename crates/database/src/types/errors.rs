//! Error types for the storage layer.

use thiserror::Error;

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Main error type for the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Profile not found: {id}")]
    ProfileNotFound { id: String },

    #[error("Connection not found: {id}")]
    ConnectionNotFound { id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl StoreError {
    pub fn connection_not_found(id: impl Into<String>) -> Self {
        Self::ConnectionNotFound { id: id.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

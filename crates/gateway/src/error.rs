//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mentorlink_database::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::DatabaseError(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "gateway error");
        }
        let body = json!({
            "error": status.as_str(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for GatewayError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::ProfileNotFound { id } => {
                GatewayError::NotFound(format!("profile {id} not found"))
            }
            StoreError::ConnectionNotFound { id } => {
                GatewayError::NotFound(format!("connection {id} not found"))
            }
            StoreError::Validation { message } => GatewayError::InvalidRequest(message),
            StoreError::Database(e) => GatewayError::DatabaseError(e.to_string()),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

//! REST endpoints for the gateway

pub mod connection;
pub mod health;
pub mod message;
pub mod profile;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::state::GatewayState;

/// Create all REST routes.
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/profiles", get(profile::find_profile))
        .route("/api/profiles/:public_id", get(profile::get_profile))
        .route(
            "/api/messages",
            get(message::list_messages).post(message::create_message),
        )
        .route(
            "/api/connections",
            get(connection::list_connections).post(connection::create_connection),
        )
        .route(
            "/api/connections/:public_id/respond",
            post(connection::respond_to_connection),
        )
}

//! # Mentorlink Gateway Crate
//!
//! HTTP surface of the backend: REST endpoints for profiles, message
//! history, and mentor/student connections, plus the `/ws` WebSocket
//! endpoint that attaches transport sessions to the message relay.

pub mod error;
pub mod rest;
pub mod state;
pub mod websocket;

pub use error::{GatewayError, GatewayResult};
pub use state::GatewayState;

use axum::{http::Method, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router with all routes.
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);

    #[allow(unused_mut)]
    let mut router = Router::new()
        .merge(rest::create_rest_routes().with_state(arc_state.clone()))
        .merge(websocket::create_websocket_routes().with_state(arc_state))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());

    #[cfg(debug_assertions)]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::health::health_check,
                rest::profile::find_profile,
                rest::profile::get_profile,
                rest::message::list_messages,
                rest::message::create_message,
                rest::connection::list_connections,
                rest::connection::create_connection,
                rest::connection::respond_to_connection,
            ),
            components(schemas(
                rest::health::HealthResponse,
                rest::profile::ProfileResponse,
                rest::message::MessageResponse,
                rest::message::CreateMessageBody,
                rest::connection::ConnectionResponse,
                rest::connection::CreateConnectionBody,
                rest::connection::RespondToConnectionBody,
            )),
            tags(
                (name = "profiles", description = "Profile lookup"),
                (name = "messages", description = "Message history"),
                (name = "connections", description = "Mentor/student connections"),
            )
        )]
        struct ApiDoc;

        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    router
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

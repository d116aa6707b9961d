//! WebSocket endpoint wiring transport sessions into the message relay.
//!
//! Each upgraded socket gets a fresh session id and an outbound queue
//! attached to the relay. Inbound frames carry [`ClientEvent`]s: `join`
//! announces which user the session belongs to, `send_message` routes a
//! payload. Neither event produces a response on this path; the only
//! server-to-client traffic is `receive_message` for payloads routed to
//! this session.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use mentorlink_relay::{ClientEvent, SessionId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::state::GatewayState;

/// Create all WebSocket routes.
pub fn create_websocket_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/ws", get(websocket_handler))
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<GatewayState>) {
    let session_id = SessionId::generate();
    let relay = state.relay.clone();

    let mut outbox = relay.attach(session_id.clone()).await;
    let (mut ws_sender, mut ws_receiver) = socket.split();

    debug!(session = %session_id, "websocket session attached");

    // Forward relay deliveries to the socket until the queue closes.
    let sender_session = session_id.clone();
    let sender_task = tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(error) => {
                    warn!(session = %sender_session, %error, "failed to encode server event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    // Identities this session has joined as, for disconnect cleanup.
    let mut joined: HashSet<String> = HashSet::new();

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(ClientEvent::Join { user_id }) => {
                    relay.join(&user_id, &session_id).await;
                    joined.insert(user_id);
                }
                Ok(ClientEvent::SendMessage { message }) => {
                    // Best effort: the outcome is observed, never surfaced
                    // back to the sender.
                    let outcome = relay.route(message).await;
                    debug!(session = %session_id, ?outcome, "routed message");
                }
                Err(error) => {
                    warn!(session = %session_id, %error, "ignoring malformed client event");
                }
            },
            Ok(Message::Close(_)) => {
                debug!(session = %session_id, "client closed websocket");
                break;
            }
            Ok(_) => {
                // Ping, pong, and binary frames are ignored.
            }
            Err(error) => {
                warn!(session = %session_id, %error, "websocket error");
                break;
            }
        }
    }

    relay.detach(&session_id).await;
    for user_id in &joined {
        relay.leave(user_id, &session_id).await;
    }
    sender_task.abort();

    info!(session = %session_id, "websocket session closed");
}

//! Message history REST endpoints
//!
//! The durable side of the chat: inserts and pair-wise history queries.
//! These are deliberately independent of the relay; a message can be
//! stored without ever being delivered live, and delivered live without
//! being stored.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mentorlink_database::{CreateMessageRequest, StoredMessage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub created_at: String,
}

impl From<StoredMessage> for MessageResponse {
    fn from(message: StoredMessage) -> Self {
        Self {
            id: message.public_id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMessageBody {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMessagesQuery {
    pub user_a: String,
    pub user_b: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    params(ListMessagesQuery),
    responses(
        (status = 200, description = "Conversation between the two users, oldest first", body = Vec<MessageResponse>)
    )
)]
pub async fn list_messages(
    Query(query): Query<ListMessagesQuery>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<MessageResponse>>> {
    let messages = state
        .messages
        .conversation(&query.user_a, &query.user_b, query.limit, query.offset)
        .await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = CreateMessageBody,
    responses(
        (status = 201, description = "Message stored", body = MessageResponse),
        (status = 400, description = "Invalid message")
    )
)]
pub async fn create_message(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<CreateMessageBody>,
) -> GatewayResult<impl IntoResponse> {
    if body.sender_id == body.receiver_id {
        return Err(GatewayError::InvalidRequest(
            "sender and receiver must differ".into(),
        ));
    }

    let stored = state
        .messages
        .insert(&CreateMessageRequest {
            sender_id: body.sender_id,
            receiver_id: body.receiver_id,
            content: body.content,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(stored))))
}

//! Mentor/student connection REST endpoints
//!
//! Connections authorize chat at the product level; the relay itself never
//! consults them. The list endpoint backs the partner-list client model.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mentorlink_database::{
    Connection, ConnectionStatus, ConnectionWithPartner, CreateConnectionRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{GatewayError, GatewayResult};
use crate::rest::profile::ProfileResponse;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionResponse {
    pub id: String,
    pub mentor_id: String,
    pub student_id: String,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<ProfileResponse>,
}

impl ConnectionResponse {
    fn from_connection(connection: Connection) -> Self {
        Self {
            id: connection.public_id,
            mentor_id: connection.mentor_id,
            student_id: connection.student_id,
            status: connection.status.to_string(),
            created_at: connection.created_at,
            partner: None,
        }
    }

    fn from_joined(joined: ConnectionWithPartner, state: &GatewayState) -> Self {
        let mut response = Self::from_connection(joined.connection);
        response.partner = Some(ProfileResponse::from_profile(joined.partner, state));
        response
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListConnectionsQuery {
    /// Profile public id of either participant.
    pub participant: String,
    /// Optional status filter: pending, accepted, or rejected.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConnectionBody {
    pub mentor_id: String,
    pub student_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RespondToConnectionBody {
    /// "accepted" or "rejected".
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/api/connections",
    tag = "connections",
    params(ListConnectionsQuery),
    responses(
        (status = 200, description = "Connections for the participant, joined to the partner profile", body = Vec<ConnectionResponse>)
    )
)]
pub async fn list_connections(
    Query(query): Query<ListConnectionsQuery>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<ConnectionResponse>>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;

    let connections = state
        .connections
        .list_for_participant(&query.participant, status)
        .await?;

    Ok(Json(
        connections
            .into_iter()
            .map(|joined| ConnectionResponse::from_joined(joined, &state))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/connections",
    tag = "connections",
    request_body = CreateConnectionBody,
    responses(
        (status = 201, description = "Pending connection created", body = ConnectionResponse),
        (status = 400, description = "Invalid participants")
    )
)]
pub async fn create_connection(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<CreateConnectionBody>,
) -> GatewayResult<impl IntoResponse> {
    let created = state
        .connections
        .create(&CreateConnectionRequest {
            mentor_id: body.mentor_id,
            student_id: body.student_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConnectionResponse::from_connection(created)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/connections/{public_id}/respond",
    tag = "connections",
    params(("public_id" = String, Path, description = "Connection public ID")),
    request_body = RespondToConnectionBody,
    responses(
        (status = 200, description = "Connection status updated", body = ConnectionResponse),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Connection not found")
    )
)]
pub async fn respond_to_connection(
    Path(public_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<RespondToConnectionBody>,
) -> GatewayResult<Json<ConnectionResponse>> {
    let status = parse_status(&body.status)?;
    if status == ConnectionStatus::Pending {
        return Err(GatewayError::InvalidRequest(
            "a response must be accepted or rejected".into(),
        ));
    }

    let updated = state.connections.set_status(&public_id, status).await?;
    Ok(Json(ConnectionResponse::from_connection(updated)))
}

fn parse_status(value: &str) -> GatewayResult<ConnectionStatus> {
    match value {
        "pending" => Ok(ConnectionStatus::Pending),
        "accepted" => Ok(ConnectionStatus::Accepted),
        "rejected" => Ok(ConnectionStatus::Rejected),
        other => Err(GatewayError::InvalidRequest(format!(
            "unknown connection status: {other}"
        ))),
    }
}

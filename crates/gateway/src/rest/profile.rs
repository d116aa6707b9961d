//! Profile REST endpoints
//!
//! Supports both client data models observed for the chat panel: the
//! ad-hoc "find the receiver by email" lookup and direct lookup by the
//! opaque profile identifier.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use mentorlink_database::Profile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    /// Public URL for the stored avatar, if any.
    pub avatar_url: Option<String>,
    pub created_at: String,
}

impl ProfileResponse {
    pub(crate) fn from_profile(profile: Profile, state: &GatewayState) -> Self {
        let avatar_url = profile
            .avatar_path
            .as_deref()
            .map(|path| state.public_object_url(path));
        Self {
            id: profile.public_id,
            email: profile.email,
            display_name: profile.display_name,
            role: profile.role.to_string(),
            avatar_url,
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FindProfileQuery {
    pub email: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/profiles",
    tag = "profiles",
    params(FindProfileQuery),
    responses(
        (status = 200, description = "Profile matching the query", body = ProfileResponse),
        (status = 400, description = "Missing query parameter"),
        (status = 404, description = "No matching profile")
    )
)]
pub async fn find_profile(
    Query(query): Query<FindProfileQuery>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<ProfileResponse>> {
    let email = query
        .email
        .ok_or_else(|| GatewayError::InvalidRequest("email query parameter is required".into()))?;

    let profile = state
        .profiles
        .find_by_email(&email)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("no profile with email {email}")))?;

    Ok(Json(ProfileResponse::from_profile(profile, &state)))
}

#[utoipa::path(
    get,
    path = "/api/profiles/{public_id}",
    tag = "profiles",
    params(("public_id" = String, Path, description = "Profile public ID")),
    responses(
        (status = 200, description = "Profile details", body = ProfileResponse),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    Path(public_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<ProfileResponse>> {
    let profile = state
        .profiles
        .find_by_public_id(&public_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("profile {public_id} not found")))?;

    Ok(Json(ProfileResponse::from_profile(profile, &state)))
}

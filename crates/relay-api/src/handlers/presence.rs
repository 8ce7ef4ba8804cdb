//! Presence handlers
//!
//! Status catalog, heartbeat, and online user listing.

use axum::{extract::State, Json};
use relay_service::{
    OnlineUserResponse, PresenceService, StatusResponse, UpdateStatusRequest, UserSummaryResponse,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Available status catalog entries
///
/// GET /statuses
pub async fn list_statuses(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<StatusResponse>>> {
    let service = PresenceService::new(state.service_context());
    let statuses = service.list_statuses().await?;
    Ok(Json(statuses))
}

/// Set the caller's status
///
/// POST /statuses/user
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<UserSummaryResponse>> {
    let service = PresenceService::new(state.service_context());
    let user = service.update_status(auth.user_id, request).await?;
    Ok(Json(user))
}

/// Record a heartbeat for the caller
///
/// POST /statuses/heartbeat
pub async fn heartbeat(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoContent> {
    let service = PresenceService::new(state.service_context());
    service.heartbeat(auth.user_id).await?;
    Ok(NoContent)
}

/// Users currently online, excluding the caller
///
/// GET /statuses/online-users
pub async fn online_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<OnlineUserResponse>>> {
    let service = PresenceService::new(state.service_context());
    let users = service.online_users(auth.user_id).await?;
    Ok(Json(users))
}

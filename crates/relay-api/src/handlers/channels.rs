//! Channel handlers
//!
//! Endpoints for channel CRUD and membership management.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use relay_service::{
    AddMemberRequest, ChannelResponse, ChannelService, CreateChannelRequest, MemberResponse,
    RemoveMemberRequest, UpdateChannelRequest,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// List the caller's channels
///
/// GET /channels
pub async fn list_channels(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ChannelResponse>>> {
    let service = ChannelService::new(state.service_context());
    let channels = service.list_channels(auth.user_id).await?;
    Ok(Json(channels))
}

/// Create a channel.
///
/// Returns 201 for a new channel and 200 when an existing direct
/// channel is reused.
///
/// POST /channels
pub async fn create_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateChannelRequest>,
) -> ApiResult<Response> {
    let service = ChannelService::new(state.service_context());
    let outcome = service.create_channel(auth.user_id, request).await?;

    if outcome.created {
        Ok(Created(Json(outcome.channel)).into_response())
    } else {
        Ok(Json(outcome.channel).into_response())
    }
}

/// Get a channel
///
/// GET /channels/{channel_id}
pub async fn get_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<ChannelResponse>> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = ChannelService::new(state.service_context());
    let channel = service.get_channel(auth.user_id, channel_id).await?;
    Ok(Json(channel))
}

/// Update a channel
///
/// PUT /channels/{channel_id}
pub async fn update_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateChannelRequest>,
) -> ApiResult<Json<ChannelResponse>> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = ChannelService::new(state.service_context());
    let channel = service
        .update_channel(auth.user_id, channel_id, request)
        .await?;
    Ok(Json(channel))
}

/// Delete a channel
///
/// DELETE /channels/{channel_id}
pub async fn delete_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> ApiResult<NoContent> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = ChannelService::new(state.service_context());
    service.delete_channel(auth.user_id, channel_id).await?;
    Ok(NoContent)
}

/// Add a member to a group channel
///
/// POST /channels/{channel_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    ValidatedJson(request): ValidatedJson<AddMemberRequest>,
) -> ApiResult<Created<Json<MemberResponse>>> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = ChannelService::new(state.service_context());
    let member = service.add_member(auth.user_id, channel_id, request).await?;
    Ok(Created(Json(member)))
}

/// Remove a member from a group channel
///
/// DELETE /channels/{channel_id}/members
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    ValidatedJson(request): ValidatedJson<RemoveMemberRequest>,
) -> ApiResult<NoContent> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = ChannelService::new(state.service_context());
    service
        .remove_member(auth.user_id, channel_id, request.user_id)
        .await?;
    Ok(NoContent)
}

/// Leave a channel
///
/// POST /channels/{channel_id}/leave
pub async fn leave_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> ApiResult<NoContent> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = ChannelService::new(state.service_context());
    service.leave(auth.user_id, channel_id).await?;
    Ok(NoContent)
}

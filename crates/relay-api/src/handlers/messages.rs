//! Message handlers
//!
//! Endpoints for message operations.

use axum::{
    extract::{Path, State},
    Json,
};
use relay_service::{
    CreateMessageRequest, MessageResponse, MessageService, PaginatedResponse, UpdateMessageRequest,
};

use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Get messages in a channel, newest first
///
/// GET /channels/{channel_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<MessageResponse>>> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = MessageService::new(state.service_context());
    let page = service
        .list_messages(auth.user_id, channel_id, pagination.into_message_query())
        .await?;
    Ok(Json(page))
}

/// Post a message
///
/// POST /channels/{channel_id}/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = MessageService::new(state.service_context());
    let response = service
        .create_message(auth.user_id, channel_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// Get a message by ID
///
/// GET /channels/{channel_id}/messages/{message_id}
pub async fn get_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((channel_id, message_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;
    let message_id = message_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))?;

    let service = MessageService::new(state.service_context());
    let response = service
        .get_message(auth.user_id, channel_id, message_id)
        .await?;
    Ok(Json(response))
}

/// Edit a message
///
/// PUT /channels/{channel_id}/messages/{message_id}
pub async fn update_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((channel_id, message_id)): Path<(String, String)>,
    ValidatedJson(request): ValidatedJson<UpdateMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;
    let message_id = message_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))?;

    let service = MessageService::new(state.service_context());
    let response = service
        .update_message(auth.user_id, channel_id, message_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete a message
///
/// DELETE /channels/{channel_id}/messages/{message_id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((channel_id, message_id)): Path<(String, String)>,
) -> ApiResult<NoContent> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;
    let message_id = message_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))?;

    let service = MessageService::new(state.service_context());
    service
        .delete_message(auth.user_id, channel_id, message_id)
        .await?;
    Ok(NoContent)
}

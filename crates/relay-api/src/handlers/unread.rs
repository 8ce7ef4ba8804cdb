//! Unread tracking handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use relay_service::{UnreadCountsResponse, UnreadService};
use serde::Serialize;

use crate::extractors::AuthUser;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for a mark-as-read call
#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub last_read_at: DateTime<Utc>,
}

/// Per-channel unread counts for the caller
///
/// GET /messages/unread-count
pub async fn unread_counts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UnreadCountsResponse>> {
    let service = UnreadService::new(state.service_context());
    let counts = service.unread_counts(auth.user_id).await?;
    Ok(Json(counts))
}

/// Advance the caller's read cursor for a channel
///
/// POST /channels/{channel_id}/messages/mark-as-read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<MarkReadResponse>> {
    let channel_id = channel_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))?;

    let service = UnreadService::new(state.service_context());
    let last_read_at = service.mark_read(auth.user_id, channel_id).await?;
    Ok(Json(MarkReadResponse { last_read_at }))
}

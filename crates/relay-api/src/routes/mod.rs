//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, channels, health, messages, presence, unread};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(channel_routes())
        .merge(message_routes())
        .merge(status_routes())
        .merge(admin_routes())
}

/// Channel and membership routes
fn channel_routes() -> Router<AppState> {
    Router::new()
        .route("/channels", get(channels::list_channels))
        .route("/channels", post(channels::create_channel))
        .route("/channels/:channel_id", get(channels::get_channel))
        .route("/channels/:channel_id", put(channels::update_channel))
        .route("/channels/:channel_id", delete(channels::delete_channel))
        .route("/channels/:channel_id/members", post(channels::add_member))
        .route(
            "/channels/:channel_id/members",
            delete(channels::remove_member),
        )
        .route("/channels/:channel_id/leave", post(channels::leave_channel))
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/channels/:channel_id/messages", get(messages::get_messages))
        .route(
            "/channels/:channel_id/messages",
            post(messages::create_message),
        )
        .route(
            "/channels/:channel_id/messages/:message_id",
            get(messages::get_message),
        )
        .route(
            "/channels/:channel_id/messages/:message_id",
            put(messages::update_message),
        )
        .route(
            "/channels/:channel_id/messages/:message_id",
            delete(messages::delete_message),
        )
        .route(
            "/channels/:channel_id/messages/mark-as-read",
            post(unread::mark_read),
        )
        .route("/messages/unread-count", get(unread::unread_counts))
}

/// Presence and status routes
fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/statuses", get(presence::list_statuses))
        .route("/statuses/user", post(presence::update_status))
        .route("/statuses/heartbeat", post(presence::heartbeat))
        .route("/statuses/online-users", get(presence::online_users))
}

/// Admin routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:user_id/role", put(admin::change_role))
        .route("/admin/users/:user_id/ban", put(admin::set_ban))
        .route("/admin/users/:user_id/active", put(admin::set_active))
        .route("/admin/users/:user_id", delete(admin::delete_user))
}

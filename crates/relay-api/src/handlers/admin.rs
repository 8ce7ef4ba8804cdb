//! Admin handlers
//!
//! User administration endpoints for global admins.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use relay_service::{
    AdminService, AdminUserResponse, ChangeRoleRequest, ListUsersQuery, SetActiveRequest,
    SetBanRequest, UserListResponse,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiError, ApiResult, NoContent};
use crate::state::AppState;

/// List users with filters and aggregate counts
///
/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let service = AdminService::new(state.service_context());
    let users = service.list_users(auth.user_id, query).await?;
    Ok(Json(users))
}

/// Change a user's global role
///
/// PUT /admin/users/{user_id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<AdminUserResponse>> {
    let user_id = user_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid user_id format"))?;

    let service = AdminService::new(state.service_context());
    let user = service.change_role(auth.user_id, user_id, request).await?;
    Ok(Json(user))
}

/// Ban or unban a user
///
/// PUT /admin/users/{user_id}/ban
pub async fn set_ban(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetBanRequest>,
) -> ApiResult<Json<AdminUserResponse>> {
    let user_id = user_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid user_id format"))?;

    let service = AdminService::new(state.service_context());
    let user = service.set_ban(auth.user_id, user_id, request).await?;
    Ok(Json(user))
}

/// Activate or deactivate a user
///
/// PUT /admin/users/{user_id}/active
pub async fn set_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    ValidatedJson(request): ValidatedJson<SetActiveRequest>,
) -> ApiResult<Json<AdminUserResponse>> {
    let user_id = user_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid user_id format"))?;

    let service = AdminService::new(state.service_context());
    let user = service.set_active(auth.user_id, user_id, request).await?;
    Ok(Json(user))
}

/// Soft delete a user account
///
/// DELETE /admin/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<NoContent> {
    let user_id = user_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid user_id format"))?;

    let service = AdminService::new(state.service_context());
    service.delete_user(auth.user_id, user_id).await?;
    Ok(NoContent)
}

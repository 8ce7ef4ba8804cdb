//! Request DTOs with validation

use relay_core::{Snowflake, UserRole};
use serde::Deserialize;
use validator::Validate;

/// Request to create a channel.
///
/// Direct channels carry exactly one other member id and no name.
/// Group channels require a name and may start with any member list.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChannelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_group: bool,

    #[serde(default)]
    pub member_ids: Vec<Snowflake>,
}

/// Request to update channel metadata
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateChannelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub is_active: Option<bool>,
}

/// Request to add a member to a group channel
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub user_id: Snowflake,
}

/// Request to remove a member from a group channel
#[derive(Debug, Deserialize, Validate)]
pub struct RemoveMemberRequest {
    pub user_id: Snowflake,
}

/// Request to send a message.
///
/// Content may be omitted when an attachment is present. The length
/// ceiling mirrors the database constraint.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(max = 5000, message = "Content must be at most 5000 characters"))]
    pub content: Option<String>,

    #[validate(length(max = 500, message = "Attachment path too long"))]
    pub attachment: Option<String>,

    #[validate(length(max = 100, message = "Attachment type too long"))]
    pub attachment_type: Option<String>,
}

/// Request to edit a message
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMessageRequest {
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,
}

/// Request to change the caller's presence status
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status_id: Snowflake,

    #[validate(length(max = 255, message = "Status message too long"))]
    pub status_message: Option<String>,
}

/// Admin request to change a user's global role
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

/// Admin request to ban or unban a user
#[derive(Debug, Deserialize, Validate)]
pub struct SetBanRequest {
    pub banned: bool,

    #[validate(length(max = 1000, message = "Ban reason too long"))]
    pub reason: Option<String>,
}

/// Admin request to activate or deactivate a user
#[derive(Debug, Deserialize, Validate)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// Query parameters for the admin user listing
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub is_banned: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

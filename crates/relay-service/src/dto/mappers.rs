//! Mappers from domain entities to response DTOs
//!
//! Services assemble the aggregates here from repository reads and let
//! the mapper produce wire shapes. Presence is always computed against
//! a single `now` so one response cannot disagree with itself.

use chrono::{DateTime, Utc};
use relay_core::{Channel, Membership, Message, Snowflake, Status, User};

use super::responses::{
    AdminUserResponse, AuthorResponse, ChannelResponse, MemberResponse, MessagePreviewResponse,
    MessageResponse, OnlineUserResponse, StatusResponse, UserSummaryResponse,
};

/// Preview length for channel listings, in characters
const PREVIEW_CHARS: usize = 80;

/// Placeholder author name for soft-deleted accounts
const DELETED_USER_NAME: &str = "Deleted user";

/// Build a public user summary, evaluating presence at `now`
pub fn user_summary(user: &User, now: DateTime<Utc>) -> UserSummaryResponse {
    UserSummaryResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        full_name: user.full_name(),
        avatar: user.avatar.clone(),
        is_online: user.is_online_at(now),
        status_message: user.status_message.clone(),
        last_seen_at: user.last_seen_at,
    }
}

/// Build an author block. A missing user means the account was
/// soft-deleted after the message was written.
pub fn author_response(user_id: Snowflake, author: Option<&User>) -> AuthorResponse {
    match author {
        Some(user) => AuthorResponse {
            id: user.id.to_string(),
            name: user.name.clone(),
            full_name: user.full_name(),
            avatar: user.avatar.clone(),
            is_deleted: false,
        },
        None => AuthorResponse {
            id: user_id.to_string(),
            name: DELETED_USER_NAME.to_string(),
            full_name: DELETED_USER_NAME.to_string(),
            avatar: None,
            is_deleted: true,
        },
    }
}

pub fn status_response(status: &Status) -> StatusResponse {
    StatusResponse {
        id: status.id.to_string(),
        name: status.name.clone(),
        color: status.color.clone(),
        icon: status.icon.clone(),
        sort_order: status.sort_order,
    }
}

pub fn online_user_response(user: &User, status: Option<&Status>) -> OnlineUserResponse {
    OnlineUserResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        full_name: user.full_name(),
        avatar: user.avatar.clone(),
        status: status.map(status_response),
        status_message: user.status_message.clone(),
        last_seen_at: user.last_seen_at.unwrap_or(user.created_at),
    }
}

/// Full user record for the admin console
pub fn admin_user_response(user: &User, now: DateTime<Utc>) -> AdminUserResponse {
    AdminUserResponse {
        id: user.id.to_string(),
        name: user.name.clone(),
        full_name: user.full_name(),
        email: user.email.clone(),
        avatar: user.avatar.clone(),
        role: user.role.as_str().to_string(),
        is_active: user.is_active,
        is_banned: user.is_banned,
        ban_reason: user.ban_reason.clone(),
        banned_at: user.banned_at,
        is_online: user.is_online_at(now),
        last_seen_at: user.last_seen_at,
        created_at: user.created_at,
    }
}

/// Message paired with its (possibly soft-deleted) author
#[derive(Debug)]
pub struct MessageWithAuthor {
    pub message: Message,
    pub author: Option<User>,
}

impl MessageWithAuthor {
    pub fn into_response(self) -> MessageResponse {
        let author = author_response(self.message.user_id, self.author.as_ref());
        MessageResponse {
            id: self.message.id.to_string(),
            channel_id: self.message.channel_id.to_string(),
            author,
            content: self.message.content,
            attachment: self.message.attachment,
            attachment_type: self.message.attachment_type,
            created_at: self.message.created_at,
            edited_at: self.message.edited_at,
        }
    }

    pub fn preview(&self) -> MessagePreviewResponse {
        let author_name = self
            .author
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| DELETED_USER_NAME.to_string());
        MessagePreviewResponse {
            id: self.message.id.to_string(),
            author_name,
            preview: self.message.preview(PREVIEW_CHARS),
            has_attachment: self.message.has_attachment(),
            created_at: self.message.created_at,
        }
    }
}

/// Channel aggregate assembled for a specific viewer
#[derive(Debug)]
pub struct ChannelWithDetails {
    pub channel: Channel,
    /// Memberships paired with their user rows; a missing user means a
    /// soft-deleted account still holding a membership row.
    pub members: Vec<(Membership, Option<User>)>,
    pub last_message: Option<MessageWithAuthor>,
    pub unread_count: i64,
    pub viewer_id: Snowflake,
}

impl ChannelWithDetails {
    /// Produce the wire shape, evaluating presence at `now`.
    ///
    /// Direct channels take the counterpart's name as display name.
    pub fn into_response(self, now: DateTime<Utc>) -> ChannelResponse {
        let viewer_cursor = self
            .members
            .iter()
            .find(|(m, _)| m.user_id == self.viewer_id)
            .and_then(|(m, _)| m.last_read_at);

        let display_name = if self.channel.is_direct() {
            self.members
                .iter()
                .find(|(m, _)| m.user_id != self.viewer_id)
                .and_then(|(_, u)| u.as_ref())
                .map(|u| u.full_name())
                .unwrap_or_else(|| self.channel.display_name().to_string())
        } else {
            self.channel.display_name().to_string()
        };

        let members = self
            .members
            .into_iter()
            .filter_map(|(membership, user)| {
                user.map(|u| MemberResponse {
                    user: user_summary(&u, now),
                    is_admin: membership.is_admin,
                    is_muted: membership.is_muted,
                    joined_at: membership.joined_at,
                })
            })
            .collect();

        ChannelResponse {
            id: self.channel.id.to_string(),
            name: display_name,
            description: self.channel.description,
            is_group: self.channel.is_group,
            is_active: self.channel.is_active,
            created_by: self
                .channel
                .created_by
                .map(|id| id.to_string())
                .unwrap_or_default(),
            members,
            last_message: self.last_message.map(|m| m.preview()),
            last_message_at: self.channel.last_message_at,
            unread_count: self.unread_count,
            last_read_at: viewer_cursor,
            created_at: self.channel.created_at,
        }
    }
}

//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("Status not found: {0}")]
    StatusNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message content required when no attachment is present")]
    ContentRequired,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Direct channel requires exactly one recipient")]
    DirectChannelExactlyOneRecipient,

    #[error("Cannot open a direct channel with yourself")]
    SelfDirectChannel,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a member of this channel")]
    NotChannelMember,

    #[error("Not a channel admin")]
    NotChannelAdmin,

    #[error("Not message author")]
    NotMessageAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already a member of this channel")]
    AlreadyMember,

    #[error("User is not a member of this channel")]
    NotAMember,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Direct channel membership cannot change")]
    DirectChannelImmutableMembers,

    #[error("Admins cannot change their own role")]
    SelfRoleChange,

    #[error("Admins cannot ban themselves")]
    SelfBan,

    #[error("Admins cannot deactivate themselves")]
    SelfDeactivate,

    #[error("Admins cannot delete their own account")]
    SelfDelete,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::StatusNotFound(_) => "UNKNOWN_STATUS",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentRequired => "CONTENT_REQUIRED",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::DirectChannelExactlyOneRecipient => "DIRECT_CHANNEL_RECIPIENT_COUNT",
            Self::SelfDirectChannel => "SELF_DIRECT_CHANNEL",

            // Authorization
            Self::NotChannelMember => "NOT_CHANNEL_MEMBER",
            Self::NotChannelAdmin => "NOT_CHANNEL_ADMIN",
            Self::NotMessageAuthor => "NOT_MESSAGE_AUTHOR",

            // Conflict
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::NotAMember => "NOT_A_MEMBER",

            // Business Rules
            Self::DirectChannelImmutableMembers => "DIRECT_CHANNEL_IMMUTABLE",
            Self::SelfRoleChange => "SELF_ROLE_CHANGE",
            Self::SelfBan => "SELF_BAN",
            Self::SelfDeactivate => "SELF_DEACTIVATE",
            Self::SelfDelete => "SELF_DELETE",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ChannelNotFound(_)
                | Self::MessageNotFound(_)
                | Self::StatusNotFound(_)
        )
    }

    /// Check if this is a validation or business-rule error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::ContentRequired
                | Self::ContentTooLong { .. }
                | Self::DirectChannelExactlyOneRecipient
                | Self::SelfDirectChannel
                | Self::SelfRoleChange
                | Self::SelfBan
                | Self::SelfDeactivate
                | Self::SelfDelete
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotChannelMember | Self::NotChannelAdmin | Self::NotMessageAuthor
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyMember | Self::NotAMember | Self::DirectChannelImmutableMembers
        )
    }

    /// Check if a retry could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::StorageUnavailable(_))
    }
}

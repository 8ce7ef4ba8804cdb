//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Channel, Membership, Message, Status, User, UserRole};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

/// Filters for the admin user listing
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Substring match against name, full name, or email
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub is_banned: Option<bool>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID (soft-deleted excluded)
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find several users at once; missing ids are silently skipped
    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// List users matching a filter, newest first
    async fn list(&self, filter: &UserFilter) -> RepoResult<Vec<User>>;

    /// Count users matching a filter (ignores limit/offset)
    async fn count(&self, filter: &UserFilter) -> RepoResult<i64>;

    /// Users seen since `since`, excluding soft-deleted
    async fn list_seen_since(&self, since: DateTime<Utc>) -> RepoResult<Vec<User>>;

    /// Update an existing user
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Set `last_seen_at` without rewriting the whole row
    async fn touch_last_seen(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()>;

    /// Soft delete a user
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Status Repository
// ============================================================================

#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Find status by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Status>>;

    /// Available catalog entries ordered by sort_order
    async fn list_available(&self) -> RepoResult<Vec<Status>>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by ID (soft-deleted excluded)
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// Find a direct channel by its canonical member-pair key
    async fn find_direct_by_key(&self, key: &str) -> RepoResult<Option<Channel>>;

    /// List a user's channels, most recently active first
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Channel>>;

    /// Insert a direct channel plus both memberships in one transaction.
    ///
    /// On a `direct_key` conflict (concurrent double-create) the existing
    /// row is returned instead. The bool is true when this call created
    /// the channel.
    async fn create_direct(&self, channel: &Channel, other: Snowflake)
        -> RepoResult<(Channel, bool)>;

    /// Insert a group channel, its admin creator membership, and the
    /// listed plain memberships in one transaction
    async fn create_group(&self, channel: &Channel, member_ids: &[Snowflake]) -> RepoResult<()>;

    /// Update an existing channel
    async fn update(&self, channel: &Channel) -> RepoResult<()>;

    /// Soft delete a channel
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find a user's membership in a channel
    async fn find(&self, channel_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<Membership>>;

    /// All memberships of a channel
    async fn find_by_channel(&self, channel_id: Snowflake) -> RepoResult<Vec<Membership>>;

    /// Add a membership; duplicate pairs surface as `AlreadyMember`
    async fn add(&self, membership: &Membership) -> RepoResult<()>;

    /// Remove a membership; returns false when none existed
    async fn remove(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Advance the read cursor
    async fn mark_read(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        at: DateTime<Utc>,
    ) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Pagination options for message queries
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    pub limit: i64,
}

/// One page of messages, newest first
#[derive(Debug, Clone, Default)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub has_more: bool,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID (soft-deleted excluded)
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// List messages in a channel, newest first, with cursor pagination
    async fn find_by_channel(&self, channel_id: Snowflake, query: MessageQuery)
        -> RepoResult<MessagePage>;

    /// Latest non-deleted message of each listed channel
    async fn find_latest_per_channel(&self, channel_ids: &[Snowflake])
        -> RepoResult<Vec<Message>>;

    /// Insert a message and bump the channel's `last_message_at` in one
    /// transaction. The bump is monotonic so an out-of-order commit never
    /// moves the channel's activity timestamp backwards.
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Update message content (edit)
    async fn update(&self, message: &Message) -> RepoResult<()>;

    /// Soft delete a message
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Per-channel unread counts for a user's memberships.
    ///
    /// Counts non-deleted messages by other authors created after the
    /// membership's read cursor (all of them when the cursor is null).
    /// Channels with zero unread are omitted.
    async fn unread_counts(&self, user_id: Snowflake) -> RepoResult<Vec<(Snowflake, i64)>>;
}

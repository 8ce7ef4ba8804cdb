//! Membership entity - a user's row in a channel

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Channel membership
///
/// One row per (channel, user). `last_read_at` is the user's read
/// cursor: messages created after it (or all of them when it is null)
/// count as unread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    pub is_admin: bool,
    pub is_muted: bool,
    pub joined_at: DateTime<Utc>,
    pub last_read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Create a new membership, unread from the beginning
    #[must_use]
    pub fn new(channel_id: Snowflake, user_id: Snowflake, is_admin: bool) -> Self {
        let now = Utc::now();
        Self {
            channel_id,
            user_id,
            is_admin,
            is_muted: false,
            joined_at: now,
            last_read_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Advance the read cursor to now
    pub fn mark_read(&mut self) {
        self.last_read_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Whether a message created at `at` counts as unread for this member
    #[must_use]
    pub fn is_unread(&self, at: DateTime<Utc>) -> bool {
        match self.last_read_at {
            None => true,
            Some(cursor) => at > cursor,
        }
    }
}

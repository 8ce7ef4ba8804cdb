//! Channel entity - a direct (2-party) or group (N-party) conversation

use chrono::{DateTime, Utc};

use crate::value_objects::{direct_key, Snowflake};

/// Channel entity
///
/// `is_group` is immutable after creation. Direct channels carry a
/// canonical `direct_key` for the member pair; group channels leave it
/// null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_group: bool,
    pub is_active: bool,
    pub created_by: Option<Snowflake>,
    pub direct_key: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    /// Create a new direct channel between two users
    #[must_use]
    pub fn new_direct(id: Snowflake, creator: Snowflake, other: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: None,
            description: None,
            is_group: false,
            is_active: true,
            created_by: Some(creator),
            direct_key: Some(direct_key(creator, other)),
            last_message_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new group channel
    #[must_use]
    pub fn new_group(
        id: Snowflake,
        creator: Snowflake,
        name: String,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: Some(name),
            description,
            is_group: true,
            is_active: true,
            created_by: Some(creator),
            direct_key: None,
            last_message_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_direct(&self) -> bool {
        !self.is_group
    }

    /// Display name (group name, or a fallback for direct channels)
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Direct conversation")
    }

    /// Update name
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
        self.updated_at = Utc::now();
    }

    /// Update description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    /// Archive or reactivate the channel
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Utc::now();
    }
}

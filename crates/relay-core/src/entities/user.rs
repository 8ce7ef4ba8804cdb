//! User entity - represents an account in the messaging system

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// How recently a user must have been seen to count as online (seconds).
///
/// There is no background sweep; staleness is evaluated lazily against the
/// caller's `now` whenever presence is queried.
pub const ONLINE_WINDOW_SECS: i64 = 5 * 60;

/// Global user role
///
/// A `moderator` role existed historically; rows still carrying it are
/// read back as plain users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Database string representation
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            // "moderator" and anything unknown degrade to plain user
            _ => Self::User,
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub banned_at: Option<DateTime<Utc>>,
    pub status_id: Option<Snowflake>,
    pub status_message: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active, unbanned user
    #[must_use]
    pub fn new(id: Snowflake, name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            first_name: None,
            last_name: None,
            email,
            avatar: None,
            role: UserRole::User,
            is_active: true,
            is_banned: false,
            ban_reason: None,
            banned_at: None,
            status_id: None,
            status_message: None,
            last_seen_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full name from first/last, falling back to the account name
    #[must_use]
    pub fn full_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if full.is_empty() {
            self.name.clone()
        } else {
            full.to_string()
        }
    }

    /// Whether the user counts as online at `now`
    ///
    /// `last_seen_at` null means never-online.
    #[must_use]
    pub fn is_online_at(&self, now: DateTime<Utc>) -> bool {
        self.last_seen_at
            .is_some_and(|seen| now - seen <= Duration::seconds(ONLINE_WINDOW_SECS))
    }

    /// Whether the user counts as online right now
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.is_online_at(Utc::now())
    }

    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Record activity (heartbeat or any status-changing action)
    pub fn touch_seen(&mut self) {
        self.last_seen_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Apply a ban with an optional reason
    pub fn ban(&mut self, reason: Option<String>) {
        self.is_banned = true;
        self.ban_reason = reason;
        self.banned_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Lift a ban, clearing reason and timestamp
    pub fn unban(&mut self) {
        self.is_banned = false;
        self.ban_reason = None;
        self.banned_at = None;
        self.updated_at = Utc::now();
    }
}

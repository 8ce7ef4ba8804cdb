//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for channel_members table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub channel_id: i64,
    pub user_id: i64,
    pub is_admin: bool,
    pub is_muted: bool,
    pub joined_at: DateTime<Utc>,
    pub last_read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

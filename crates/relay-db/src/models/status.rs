//! Status database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for statuses table
#[derive(Debug, Clone, FromRow)]
pub struct StatusModel {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_available: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

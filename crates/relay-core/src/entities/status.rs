//! Status entity - catalog of presence statuses users can pick from

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A selectable presence status ("Available", "Busy", ...)
///
/// The catalog is admin-managed; regular users only read it and point
/// their `status_id` at an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub id: Snowflake,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_available: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Status {
    #[must_use]
    pub fn new(id: Snowflake, name: String, sort_order: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            color: None,
            icon: None,
            is_available: true,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}

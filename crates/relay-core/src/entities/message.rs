//! Message entity

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Maximum message content length in characters
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Message entity
///
/// A message carries text content, an attachment, or both. Rows are
/// soft-deleted; read state lives on the membership cursor, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    pub content: Option<String>,
    pub attachment: Option<String>,
    pub attachment_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Message {
    #[must_use]
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        user_id: Snowflake,
        content: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            channel_id,
            user_id,
            content,
            attachment: None,
            attachment_type: None,
            created_at: now,
            updated_at: now,
            edited_at: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// Replace the content and stamp the edit time
    pub fn edit(&mut self, content: String) {
        self.content = Some(content);
        let now = Utc::now();
        self.edited_at = Some(now);
        self.updated_at = now;
    }

    /// Short preview of the content, truncated on a char boundary
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        match &self.content {
            Some(content) => {
                if content.chars().count() <= max_chars {
                    content.clone()
                } else {
                    let truncated: String = content.chars().take(max_chars).collect();
                    format!("{truncated}...")
                }
            }
            None if self.has_attachment() => "[attachment]".to_string(),
            None => String::new(),
        }
    }
}

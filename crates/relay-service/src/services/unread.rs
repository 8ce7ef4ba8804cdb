//! Unread tracking service
//!
//! Read state is a single per-membership cursor. Unread counts are
//! derived from it on demand; nothing is stored per message.

use chrono::{DateTime, Utc};
use relay_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{ChannelUnread, UnreadCountsResponse};

use super::access::AccessGuard;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Unread tracking service
pub struct UnreadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UnreadService<'a> {
    /// Create a new UnreadService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Per-channel unread counts for the caller.
    ///
    /// Channels with nothing unread are omitted.
    #[instrument(skip(self))]
    pub async fn unread_counts(&self, user_id: Snowflake) -> ServiceResult<UnreadCountsResponse> {
        let counts = self.ctx.message_repo().unread_counts(user_id).await?;

        let total = counts.iter().map(|(_, count)| count).sum();
        let channels = counts
            .into_iter()
            .map(|(channel_id, count)| ChannelUnread {
                channel_id: channel_id.to_string(),
                count,
            })
            .collect();

        Ok(UnreadCountsResponse { total, channels })
    }

    /// Advance the caller's read cursor for a channel to now
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<DateTime<Utc>> {
        AccessGuard::new(self.ctx)
            .require_member(channel_id, user_id)
            .await?;

        let now = Utc::now();
        self.ctx
            .membership_repo()
            .mark_read(channel_id, user_id, now)
            .await?;

        info!(channel_id = %channel_id, user_id = %user_id, "channel marked read");
        Ok(now)
    }
}

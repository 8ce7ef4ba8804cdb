//! Access guard - authorization predicates shared by the services
//!
//! All channel-scoped operations pass through `require_member` first.
//! A missing channel and a channel the caller does not belong to produce
//! the same error, so existence is never leaked to non-members.

use relay_core::entities::{Channel, Membership, User};
use relay_core::error::DomainError;
use relay_core::Snowflake;
use tracing::instrument;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authorization predicates over channels and global roles
pub struct AccessGuard<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessGuard<'a> {
    /// Create a new AccessGuard
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Require that `user_id` is a member of `channel_id`.
    ///
    /// Returns the channel and the caller's membership. Fails with the
    /// same error whether the channel is missing or the caller simply is
    /// not in it.
    #[instrument(skip(self))]
    pub async fn require_member(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<(Channel, Membership)> {
        let channel = self
            .ctx
            .channel_repo()
            .find_by_id(channel_id)
            .await?
            .ok_or(DomainError::NotChannelMember)?;

        let membership = self
            .ctx
            .membership_repo()
            .find(channel_id, user_id)
            .await?
            .ok_or(DomainError::NotChannelMember)?;

        Ok((channel, membership))
    }

    /// Require membership plus the per-channel admin flag.
    ///
    /// Channel admin is independent of the global role.
    #[instrument(skip(self))]
    pub async fn require_channel_admin(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<(Channel, Membership)> {
        let (channel, membership) = self.require_member(channel_id, user_id).await?;

        if !membership.is_admin {
            return Err(DomainError::NotChannelAdmin.into());
        }

        Ok((channel, membership))
    }

    /// Require that the actor holds the global admin role
    #[instrument(skip(self))]
    pub async fn require_global_admin(&self, user_id: Snowflake) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::permission_denied("unknown user"))?;

        if !user.is_admin() {
            return Err(ServiceError::permission_denied("global admin required"));
        }

        Ok(user)
    }
}

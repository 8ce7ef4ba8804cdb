//! Channel service
//!
//! Creation and management of direct and group channels. Direct channel
//! creation is idempotent per user pair; a concurrent double-create is
//! resolved in the repository and surfaces here as `created = false`.

use std::collections::HashMap;

use relay_core::entities::{Channel, Membership, User};
use relay_core::error::DomainError;
use relay_core::Snowflake;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    AddMemberRequest, ChannelResponse, ChannelWithDetails, CreateChannelRequest, MemberResponse,
    MessageWithAuthor, UpdateChannelRequest,
};

use super::access::AccessGuard;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Outcome of a channel create call.
///
/// `created` distinguishes a fresh channel from an existing direct
/// channel the caller was routed back to.
#[derive(Debug)]
pub struct CreateChannelOutcome {
    pub channel: ChannelResponse,
    pub created: bool,
}

/// Channel service
pub struct ChannelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelService<'a> {
    /// Create a new ChannelService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a direct or group channel
    #[instrument(skip(self, request))]
    pub async fn create_channel(
        &self,
        user_id: Snowflake,
        request: CreateChannelRequest,
    ) -> ServiceResult<CreateChannelOutcome> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        if request.is_group {
            self.create_group_channel(user_id, request).await
        } else {
            self.create_direct_channel(user_id, request).await
        }
    }

    async fn create_direct_channel(
        &self,
        user_id: Snowflake,
        request: CreateChannelRequest,
    ) -> ServiceResult<CreateChannelOutcome> {
        let mut recipients = request.member_ids.clone();
        recipients.sort_unstable();
        recipients.dedup();

        if recipients.len() != 1 {
            return Err(DomainError::DirectChannelExactlyOneRecipient.into());
        }
        let other = recipients[0];
        if other == user_id {
            return Err(DomainError::SelfDirectChannel.into());
        }

        // Recipient must be a live account
        self.ctx
            .user_repo()
            .find_by_id(other)
            .await?
            .ok_or(DomainError::UserNotFound(other))?;

        let channel = Channel::new_direct(self.ctx.generate_id(), user_id, other);
        let (channel, created) = self
            .ctx
            .channel_repo()
            .create_direct(&channel, other)
            .await?;

        if created {
            info!(
                channel_id = %channel.id,
                user_id = %user_id,
                other_id = %other,
                "direct channel created"
            );
        }

        let details = self.load_details(channel, user_id).await?;
        Ok(CreateChannelOutcome {
            channel: details.into_response(chrono::Utc::now()),
            created,
        })
    }

    async fn create_group_channel(
        &self,
        user_id: Snowflake,
        request: CreateChannelRequest,
    ) -> ServiceResult<CreateChannelOutcome> {
        let name = request
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| DomainError::ValidationError("Group channels require a name".into()))?;

        let mut member_ids = request.member_ids;
        member_ids.sort_unstable();
        member_ids.dedup();
        member_ids.retain(|id| *id != user_id);

        // Every listed member must resolve to a live account
        let found = self.ctx.user_repo().find_many(&member_ids).await?;
        if found.len() != member_ids.len() {
            let found_ids: Vec<Snowflake> = found.iter().map(|u| u.id).collect();
            if let Some(missing) = member_ids.iter().find(|id| !found_ids.contains(id)) {
                return Err(DomainError::UserNotFound(*missing).into());
            }
        }

        let channel = Channel::new_group(
            self.ctx.generate_id(),
            user_id,
            name,
            request.description,
        );
        self.ctx
            .channel_repo()
            .create_group(&channel, &member_ids)
            .await?;

        info!(
            channel_id = %channel.id,
            user_id = %user_id,
            member_count = member_ids.len() + 1,
            "group channel created"
        );

        let details = self.load_details(channel, user_id).await?;
        Ok(CreateChannelOutcome {
            channel: details.into_response(chrono::Utc::now()),
            created: true,
        })
    }

    /// List the caller's channels, most recently active first, with
    /// member summaries, last-message previews, and unread counts
    #[instrument(skip(self))]
    pub async fn list_channels(&self, user_id: Snowflake) -> ServiceResult<Vec<ChannelResponse>> {
        let channels = self.ctx.channel_repo().find_by_user(user_id).await?;
        if channels.is_empty() {
            return Ok(Vec::new());
        }

        let channel_ids: Vec<Snowflake> = channels.iter().map(|c| c.id).collect();

        let mut latest: HashMap<Snowflake, _> = self
            .ctx
            .message_repo()
            .find_latest_per_channel(&channel_ids)
            .await?
            .into_iter()
            .map(|m| (m.channel_id, m))
            .collect();

        let unread: HashMap<Snowflake, i64> = self
            .ctx
            .message_repo()
            .unread_counts(user_id)
            .await?
            .into_iter()
            .collect();

        let mut memberships: HashMap<Snowflake, Vec<Membership>> = HashMap::new();
        for id in &channel_ids {
            memberships.insert(*id, self.ctx.membership_repo().find_by_channel(*id).await?);
        }

        // One bulk user fetch covers members and last-message authors
        let mut user_ids: Vec<Snowflake> = memberships
            .values()
            .flatten()
            .map(|m| m.user_id)
            .chain(latest.values().map(|m| m.user_id))
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let users: HashMap<Snowflake, User> = self
            .ctx
            .user_repo()
            .find_many(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let now = chrono::Utc::now();
        let mut responses = Vec::with_capacity(channels.len());
        for channel in channels {
            let members = memberships
                .remove(&channel.id)
                .unwrap_or_default()
                .into_iter()
                .map(|m| {
                    let user = users.get(&m.user_id).cloned();
                    (m, user)
                })
                .collect();

            let last_message = latest.remove(&channel.id).map(|message| MessageWithAuthor {
                author: users.get(&message.user_id).cloned(),
                message,
            });

            let unread_count = unread.get(&channel.id).copied().unwrap_or(0);

            responses.push(
                ChannelWithDetails {
                    channel,
                    members,
                    last_message,
                    unread_count,
                    viewer_id: user_id,
                }
                .into_response(now),
            );
        }

        Ok(responses)
    }

    /// Get a single channel the caller belongs to
    #[instrument(skip(self))]
    pub async fn get_channel(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<ChannelResponse> {
        let (channel, _) = AccessGuard::new(self.ctx)
            .require_member(channel_id, user_id)
            .await?;

        let details = self.load_details(channel, user_id).await?;
        Ok(details.into_response(chrono::Utc::now()))
    }

    /// Update channel metadata (channel admin only)
    #[instrument(skip(self, request))]
    pub async fn update_channel(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        request: UpdateChannelRequest,
    ) -> ServiceResult<ChannelResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let (mut channel, _) = AccessGuard::new(self.ctx)
            .require_channel_admin(channel_id, user_id)
            .await?;

        if let Some(name) = request.name {
            channel.set_name(name);
        }
        if let Some(description) = request.description {
            channel.set_description(Some(description));
        }
        if let Some(active) = request.is_active {
            channel.set_active(active);
        }
        self.ctx.channel_repo().update(&channel).await?;

        info!(channel_id = %channel_id, user_id = %user_id, "channel updated");

        let details = self.load_details(channel, user_id).await?;
        Ok(details.into_response(chrono::Utc::now()))
    }

    /// Soft delete a channel (channel admin only)
    #[instrument(skip(self))]
    pub async fn delete_channel(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<()> {
        AccessGuard::new(self.ctx)
            .require_channel_admin(channel_id, user_id)
            .await?;

        self.ctx.channel_repo().delete(channel_id).await?;

        info!(channel_id = %channel_id, user_id = %user_id, "channel deleted");
        Ok(())
    }

    /// Add a member to a group channel (channel admin only)
    #[instrument(skip(self, request))]
    pub async fn add_member(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        request: AddMemberRequest,
    ) -> ServiceResult<MemberResponse> {
        let (channel, _) = AccessGuard::new(self.ctx)
            .require_channel_admin(channel_id, user_id)
            .await?;

        if channel.is_direct() {
            return Err(DomainError::DirectChannelImmutableMembers.into());
        }

        let target = self
            .ctx
            .user_repo()
            .find_by_id(request.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(request.user_id))?;

        let membership = Membership::new(channel_id, target.id, false);
        self.ctx.membership_repo().add(&membership).await?;

        info!(
            channel_id = %channel_id,
            user_id = %user_id,
            target_id = %target.id,
            "member added"
        );

        Ok(MemberResponse {
            user: crate::dto::mappers::user_summary(&target, chrono::Utc::now()),
            is_admin: membership.is_admin,
            is_muted: membership.is_muted,
            joined_at: membership.joined_at,
        })
    }

    /// Remove a member from a group channel (channel admin only).
    ///
    /// Removing a user who is not a member is a no-op.
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        target_id: Snowflake,
    ) -> ServiceResult<()> {
        let (channel, _) = AccessGuard::new(self.ctx)
            .require_channel_admin(channel_id, user_id)
            .await?;

        if channel.is_direct() {
            return Err(DomainError::DirectChannelImmutableMembers.into());
        }

        let removed = self
            .ctx
            .membership_repo()
            .remove(channel_id, target_id)
            .await?;

        if removed {
            info!(
                channel_id = %channel_id,
                user_id = %user_id,
                target_id = %target_id,
                "member removed"
            );
        }
        Ok(())
    }

    /// Leave a channel.
    ///
    /// Works on any channel type; only admin-driven add/remove is
    /// restricted to group channels.
    #[instrument(skip(self))]
    pub async fn leave(&self, user_id: Snowflake, channel_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .channel_repo()
            .find_by_id(channel_id)
            .await?
            .ok_or(DomainError::NotChannelMember)?;

        let removed = self
            .ctx
            .membership_repo()
            .remove(channel_id, user_id)
            .await?;
        if !removed {
            return Err(DomainError::NotAMember.into());
        }

        info!(channel_id = %channel_id, user_id = %user_id, "member left channel");
        Ok(())
    }

    /// Assemble the full aggregate for one channel
    async fn load_details(
        &self,
        channel: Channel,
        viewer_id: Snowflake,
    ) -> ServiceResult<ChannelWithDetails> {
        let memberships = self
            .ctx
            .membership_repo()
            .find_by_channel(channel.id)
            .await?;

        let last_message = self
            .ctx
            .message_repo()
            .find_latest_per_channel(&[channel.id])
            .await?
            .pop();

        let mut user_ids: Vec<Snowflake> = memberships.iter().map(|m| m.user_id).collect();
        if let Some(m) = &last_message {
            user_ids.push(m.user_id);
        }
        user_ids.sort_unstable();
        user_ids.dedup();
        let users: HashMap<Snowflake, User> = self
            .ctx
            .user_repo()
            .find_many(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let unread_count = self
            .ctx
            .message_repo()
            .unread_counts(viewer_id)
            .await?
            .into_iter()
            .find(|(id, _)| *id == channel.id)
            .map(|(_, count)| count)
            .unwrap_or(0);

        let members = memberships
            .into_iter()
            .map(|m| {
                let user = users.get(&m.user_id).cloned();
                (m, user)
            })
            .collect();

        let last_message = last_message.map(|message| MessageWithAuthor {
            author: users.get(&message.user_id).cloned(),
            message,
        });

        Ok(ChannelWithDetails {
            channel,
            members,
            last_message,
            unread_count,
            viewer_id,
        })
    }
}

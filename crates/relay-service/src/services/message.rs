//! Message service
//!
//! Posting, editing, and deleting messages. The membership gate runs
//! before any validation so non-members learn nothing about a channel,
//! not even that their payload was malformed.

use std::collections::HashMap;

use relay_core::entities::{Message, User, MAX_CONTENT_CHARS};
use relay_core::error::DomainError;
use relay_core::traits::MessageQuery;
use relay_core::Snowflake;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    CreateMessageRequest, MessageResponse, MessageWithAuthor, PaginatedResponse,
    UpdateMessageRequest,
};

use super::access::AccessGuard;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List messages in a channel, newest first
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        query: MessageQuery,
    ) -> ServiceResult<PaginatedResponse<MessageResponse>> {
        AccessGuard::new(self.ctx)
            .require_member(channel_id, user_id)
            .await?;

        let limit = query.limit;
        let page = self
            .ctx
            .message_repo()
            .find_by_channel(channel_id, query)
            .await?;

        let mut author_ids: Vec<Snowflake> = page.messages.iter().map(|m| m.user_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<Snowflake, User> = self
            .ctx
            .user_repo()
            .find_many(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        // Older pages continue from the oldest id in this page
        let before_cursor = if page.has_more {
            page.messages.last().map(|m| m.id.to_string())
        } else {
            None
        };

        let data = page
            .messages
            .into_iter()
            .map(|message| {
                MessageWithAuthor {
                    author: authors.get(&message.user_id).cloned(),
                    message,
                }
                .into_response()
            })
            .collect();

        Ok(PaginatedResponse::new(
            data,
            before_cursor,
            None,
            page.has_more,
            limit,
        ))
    }

    /// Post a message to a channel
    #[instrument(skip(self, request))]
    pub async fn create_message(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        request: CreateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        AccessGuard::new(self.ctx)
            .require_member(channel_id, user_id)
            .await?;

        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let content = request
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let attachment = request.attachment.filter(|a| !a.is_empty());

        if content.is_none() && attachment.is_none() {
            return Err(DomainError::ContentRequired.into());
        }
        if let Some(content) = &content {
            if content.chars().count() > MAX_CONTENT_CHARS {
                return Err(DomainError::ContentTooLong {
                    max: MAX_CONTENT_CHARS,
                }
                .into());
            }
        }

        let mut message = Message::new(self.ctx.generate_id(), channel_id, user_id, content);
        message.attachment = attachment;
        message.attachment_type = request.attachment_type.filter(|t| !t.is_empty());

        self.ctx.message_repo().create(&message).await?;

        info!(
            message_id = %message.id,
            channel_id = %channel_id,
            user_id = %user_id,
            has_attachment = message.has_attachment(),
            "message created"
        );

        let author = self.ctx.user_repo().find_by_id(user_id).await?;
        Ok(MessageWithAuthor { message, author }.into_response())
    }

    /// Get a single message from a channel
    #[instrument(skip(self))]
    pub async fn get_message(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<MessageResponse> {
        AccessGuard::new(self.ctx)
            .require_member(channel_id, user_id)
            .await?;

        let message = self.find_in_channel(channel_id, message_id).await?;
        let author = self.ctx.user_repo().find_by_id(message.user_id).await?;
        Ok(MessageWithAuthor { message, author }.into_response())
    }

    /// Edit a message (author only)
    #[instrument(skip(self, request))]
    pub async fn update_message(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
        request: UpdateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        AccessGuard::new(self.ctx)
            .require_member(channel_id, user_id)
            .await?;

        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let mut message = self.find_in_channel(channel_id, message_id).await?;
        if message.user_id != user_id {
            return Err(DomainError::NotMessageAuthor.into());
        }

        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::ContentRequired.into());
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(DomainError::ContentTooLong {
                max: MAX_CONTENT_CHARS,
            }
            .into());
        }

        message.edit(content);
        self.ctx.message_repo().update(&message).await?;

        info!(message_id = %message_id, user_id = %user_id, "message edited");

        let author = self.ctx.user_repo().find_by_id(user_id).await?;
        Ok(MessageWithAuthor { message, author }.into_response())
    }

    /// Delete a message (author or channel admin).
    ///
    /// Attachment cleanup is best effort; a storage failure is logged
    /// and never blocks the delete.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        user_id: Snowflake,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<()> {
        let (_, membership) = AccessGuard::new(self.ctx)
            .require_member(channel_id, user_id)
            .await?;

        let message = self.find_in_channel(channel_id, message_id).await?;
        if message.user_id != user_id && !membership.is_admin {
            return Err(DomainError::NotMessageAuthor.into());
        }

        self.ctx.message_repo().delete(message_id).await?;

        if let Some(attachment) = &message.attachment {
            if let Err(e) = self.ctx.attachment_store().delete(attachment).await {
                warn!(
                    message_id = %message_id,
                    attachment = %attachment,
                    error = %e,
                    "attachment cleanup failed"
                );
            }
        }

        info!(message_id = %message_id, user_id = %user_id, "message deleted");
        Ok(())
    }

    /// Fetch a message and confirm it belongs to the channel
    async fn find_in_channel(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ServiceResult<Message> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        // A message id from another channel is treated as unknown
        if message.channel_id != channel_id {
            return Err(DomainError::MessageNotFound(message_id).into());
        }

        Ok(message)
    }
}

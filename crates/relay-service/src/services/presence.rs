//! Presence service
//!
//! Presence is lazy: clients heartbeat `last_seen_at` and anyone seen
//! within the online window counts as online. There is no background
//! sweep and no stored online flag to go stale.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use relay_core::entities::ONLINE_WINDOW_SECS;
use relay_core::error::DomainError;
use relay_core::Snowflake;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::mappers::{online_user_response, status_response, user_summary};
use crate::dto::{OnlineUserResponse, StatusResponse, UpdateStatusRequest, UserSummaryResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a heartbeat for the caller
    #[instrument(skip(self))]
    pub async fn heartbeat(&self, user_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .user_repo()
            .touch_last_seen(user_id, Utc::now())
            .await?;
        Ok(())
    }

    /// Point the caller's status at a catalog entry.
    ///
    /// Changing status also counts as activity.
    #[instrument(skip(self, request))]
    pub async fn update_status(
        &self,
        user_id: Snowflake,
        request: UpdateStatusRequest,
    ) -> ServiceResult<UserSummaryResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let status = self
            .ctx
            .status_repo()
            .find_by_id(request.status_id)
            .await?
            .filter(|s| s.is_available)
            .ok_or(DomainError::StatusNotFound(request.status_id))?;

        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        user.status_id = Some(status.id);
        user.status_message = request.status_message.filter(|m| !m.trim().is_empty());
        user.touch_seen();
        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, status = %status.name, "status updated");

        Ok(user_summary(&user, Utc::now()))
    }

    /// Available status catalog entries
    #[instrument(skip(self))]
    pub async fn list_statuses(&self) -> ServiceResult<Vec<StatusResponse>> {
        let statuses = self.ctx.status_repo().list_available().await?;
        Ok(statuses.iter().map(status_response).collect())
    }

    /// Users currently online, excluding the caller
    #[instrument(skip(self))]
    pub async fn online_users(&self, user_id: Snowflake) -> ServiceResult<Vec<OnlineUserResponse>> {
        let since = Utc::now() - Duration::seconds(ONLINE_WINDOW_SECS);
        let users = self.ctx.user_repo().list_seen_since(since).await?;

        let statuses: HashMap<Snowflake, _> = self
            .ctx
            .status_repo()
            .list_available()
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(users
            .iter()
            .filter(|u| u.id != user_id)
            .map(|u| {
                let status = u.status_id.and_then(|id| statuses.get(&id));
                online_user_response(u, status)
            })
            .collect())
    }
}

//! Admin service
//!
//! User administration for global admins. Every operation verifies the
//! actor's global role first, and none of the destructive ones may be
//! applied to the actor's own account.

use chrono::{Duration, Utc};
use relay_core::entities::{UserRole, ONLINE_WINDOW_SECS};
use relay_core::error::DomainError;
use relay_core::traits::UserFilter;
use relay_core::Snowflake;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::mappers::admin_user_response;
use crate::dto::{
    AdminUserResponse, ChangeRoleRequest, ListUsersQuery, SetActiveRequest, SetBanRequest,
    UserCounts, UserListResponse,
};

use super::access::AccessGuard;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

/// Admin service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    /// Create a new AdminService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List users with filters plus aggregate counts
    #[instrument(skip(self, query))]
    pub async fn list_users(
        &self,
        actor_id: Snowflake,
        query: ListUsersQuery,
    ) -> ServiceResult<UserListResponse> {
        AccessGuard::new(self.ctx).require_global_admin(actor_id).await?;

        let filter = UserFilter {
            search: query.search.filter(|s| !s.trim().is_empty()),
            role: query.role,
            is_active: query.is_active,
            is_banned: query.is_banned,
            limit: query
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            offset: query.offset.unwrap_or(0).max(0),
        };

        let users = self.ctx.user_repo().list(&filter).await?;
        let total = self.ctx.user_repo().count(&filter).await?;

        // Aggregate counts are global, not filtered
        let admins = self
            .ctx
            .user_repo()
            .count(&UserFilter {
                role: Some(UserRole::Admin),
                ..UserFilter::default()
            })
            .await?;
        let plain = self
            .ctx
            .user_repo()
            .count(&UserFilter {
                role: Some(UserRole::User),
                ..UserFilter::default()
            })
            .await?;
        let online = self
            .ctx
            .user_repo()
            .list_seen_since(Utc::now() - Duration::seconds(ONLINE_WINDOW_SECS))
            .await?
            .len() as i64;

        let now = Utc::now();
        Ok(UserListResponse {
            users: users.iter().map(|u| admin_user_response(u, now)).collect(),
            total,
            counts: UserCounts {
                admins,
                users: plain,
                online,
            },
        })
    }

    /// Change a user's global role
    #[instrument(skip(self))]
    pub async fn change_role(
        &self,
        actor_id: Snowflake,
        target_id: Snowflake,
        request: ChangeRoleRequest,
    ) -> ServiceResult<AdminUserResponse> {
        AccessGuard::new(self.ctx).require_global_admin(actor_id).await?;

        if actor_id == target_id {
            return Err(DomainError::SelfRoleChange.into());
        }

        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(target_id)
            .await?
            .ok_or(DomainError::UserNotFound(target_id))?;

        user.role = request.role;
        user.updated_at = Utc::now();
        self.ctx.user_repo().update(&user).await?;

        info!(
            actor_id = %actor_id,
            target_id = %target_id,
            role = user.role.as_str(),
            "user role changed"
        );

        Ok(admin_user_response(&user, Utc::now()))
    }

    /// Ban or unban a user
    #[instrument(skip(self, request))]
    pub async fn set_ban(
        &self,
        actor_id: Snowflake,
        target_id: Snowflake,
        request: SetBanRequest,
    ) -> ServiceResult<AdminUserResponse> {
        AccessGuard::new(self.ctx).require_global_admin(actor_id).await?;

        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        if actor_id == target_id {
            return Err(DomainError::SelfBan.into());
        }

        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(target_id)
            .await?
            .ok_or(DomainError::UserNotFound(target_id))?;

        if request.banned {
            user.ban(request.reason);
        } else {
            user.unban();
        }
        self.ctx.user_repo().update(&user).await?;

        info!(
            actor_id = %actor_id,
            target_id = %target_id,
            banned = user.is_banned,
            "user ban state changed"
        );

        Ok(admin_user_response(&user, Utc::now()))
    }

    /// Activate or deactivate a user
    #[instrument(skip(self))]
    pub async fn set_active(
        &self,
        actor_id: Snowflake,
        target_id: Snowflake,
        request: SetActiveRequest,
    ) -> ServiceResult<AdminUserResponse> {
        AccessGuard::new(self.ctx).require_global_admin(actor_id).await?;

        if actor_id == target_id && !request.active {
            return Err(DomainError::SelfDeactivate.into());
        }

        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(target_id)
            .await?
            .ok_or(DomainError::UserNotFound(target_id))?;

        user.is_active = request.active;
        user.updated_at = Utc::now();
        self.ctx.user_repo().update(&user).await?;

        info!(
            actor_id = %actor_id,
            target_id = %target_id,
            active = user.is_active,
            "user active state changed"
        );

        Ok(admin_user_response(&user, Utc::now()))
    }

    /// Soft delete a user account
    #[instrument(skip(self))]
    pub async fn delete_user(
        &self,
        actor_id: Snowflake,
        target_id: Snowflake,
    ) -> ServiceResult<()> {
        AccessGuard::new(self.ctx).require_global_admin(actor_id).await?;

        if actor_id == target_id {
            return Err(DomainError::SelfDelete.into());
        }

        self.ctx
            .user_repo()
            .find_by_id(target_id)
            .await?
            .ok_or(DomainError::UserNotFound(target_id))?;

        self.ctx.user_repo().delete(target_id).await?;

        info!(actor_id = %actor_id, target_id = %target_id, "user deleted");
        Ok(())
    }
}

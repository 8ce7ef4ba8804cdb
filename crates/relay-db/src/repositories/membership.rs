//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::Membership;
use relay_core::error::DomainError;
use relay_core::traits::{MembershipRepository, RepoResult};
use relay_core::value_objects::Snowflake;

use crate::models::MembershipModel;

use super::error::{map_db_error, map_unique_violation};

const MEMBERSHIP_COLUMNS: &str =
    "channel_id, user_id, is_admin, is_muted, joined_at, last_read_at, created_at, updated_at";

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM channel_members \
             WHERE channel_id = $1 AND user_id = $2"
        ))
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Membership::from))
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: Snowflake) -> RepoResult<Vec<Membership>> {
        let results = sqlx::query_as::<_, MembershipModel>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM channel_members \
             WHERE channel_id = $1 \
             ORDER BY joined_at, user_id"
        ))
        .bind(channel_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Membership::from).collect())
    }

    #[instrument(skip(self, membership), fields(channel_id = %membership.channel_id, user_id = %membership.user_id))]
    async fn add(&self, membership: &Membership) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO channel_members
                (channel_id, user_id, is_admin, is_muted, joined_at, last_read_at,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(membership.channel_id.into_inner())
        .bind(membership.user_id.into_inner())
        .bind(membership.is_admin)
        .bind(membership.is_muted)
        .bind(membership.joined_at)
        .bind(membership.last_read_at)
        .bind(membership.created_at)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyMember))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, channel_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM channel_members
            WHERE channel_id = $1 AND user_id = $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE channel_members
            SET last_read_at = $3, updated_at = NOW()
            WHERE channel_id = $1 AND user_id = $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotChannelMember);
        }

        Ok(())
    }
}

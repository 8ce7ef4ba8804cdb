//! PostgreSQL implementation of ChannelRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use relay_core::entities::Channel;
use relay_core::error::DomainError;
use relay_core::traits::{ChannelRepository, RepoResult};
use relay_core::value_objects::Snowflake;

use crate::models::ChannelModel;

use super::error::{channel_not_found, map_db_error};

const CHANNEL_COLUMNS: &str = "id, name, description, is_group, is_active, created_by, \
     direct_key, last_message_at, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of ChannelRepository
#[derive(Clone)]
pub struct PgChannelRepository {
    pool: PgPool,
}

impl PgChannelRepository {
    /// Create a new PgChannelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_membership(
        tx: &mut Transaction<'_, Postgres>,
        channel_id: Snowflake,
        user_id: Snowflake,
        is_admin: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO channel_members (channel_id, user_id, is_admin, joined_at, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW(), NOW())
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .bind(is_admin)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ChannelRepository for PgChannelRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn find_direct_by_key(&self, key: &str) -> RepoResult<Option<Channel>> {
        let result = sqlx::query_as::<_, ChannelModel>(&format!(
            "SELECT {CHANNEL_COLUMNS} FROM channels \
             WHERE direct_key = $1 AND deleted_at IS NULL"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Channel::from))
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Channel>> {
        let results = sqlx::query_as::<_, ChannelModel>(
            r"
            SELECT c.id, c.name, c.description, c.is_group, c.is_active, c.created_by,
                   c.direct_key, c.last_message_at, c.created_at, c.updated_at, c.deleted_at
            FROM channels c
            JOIN channel_members m ON m.channel_id = c.id
            WHERE m.user_id = $1 AND c.deleted_at IS NULL
            ORDER BY c.last_message_at DESC NULLS LAST, c.id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Channel::from).collect())
    }

    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    async fn create_direct(
        &self,
        channel: &Channel,
        other: Snowflake,
    ) -> RepoResult<(Channel, bool)> {
        let creator = channel
            .created_by
            .ok_or_else(|| DomainError::InternalError("direct channel without creator".into()))?;
        let key = channel
            .direct_key
            .as_deref()
            .ok_or_else(|| DomainError::InternalError("direct channel without key".into()))?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // DO NOTHING on a key conflict: the concurrent creator wins and we
        // re-read its row below.
        let inserted = sqlx::query_as::<_, ChannelModel>(&format!(
            "INSERT INTO channels \
                 (id, name, description, is_group, is_active, created_by, direct_key, \
                  created_at, updated_at) \
             VALUES ($1, NULL, NULL, FALSE, TRUE, $2, $3, $4, $5) \
             ON CONFLICT (direct_key) DO NOTHING \
             RETURNING {CHANNEL_COLUMNS}"
        ))
        .bind(channel.id.into_inner())
        .bind(creator.into_inner())
        .bind(key)
        .bind(channel.created_at)
        .bind(channel.updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        match inserted {
            Some(model) => {
                Self::insert_membership(&mut tx, channel.id, creator, false)
                    .await
                    .map_err(map_db_error)?;
                Self::insert_membership(&mut tx, channel.id, other, false)
                    .await
                    .map_err(map_db_error)?;
                tx.commit().await.map_err(map_db_error)?;

                Ok((Channel::from(model), true))
            }
            None => {
                tx.rollback().await.map_err(map_db_error)?;

                let existing = self
                    .find_direct_by_key(key)
                    .await?
                    .ok_or_else(|| DomainError::DatabaseError(
                        "direct channel conflict but no existing row".to_string(),
                    ))?;

                Ok((existing, false))
            }
        }
    }

    #[instrument(skip(self, channel, member_ids), fields(channel_id = %channel.id, members = member_ids.len()))]
    async fn create_group(&self, channel: &Channel, member_ids: &[Snowflake]) -> RepoResult<()> {
        let creator = channel
            .created_by
            .ok_or_else(|| DomainError::InternalError("group channel without creator".into()))?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO channels
                (id, name, description, is_group, is_active, created_by, direct_key,
                 created_at, updated_at)
            VALUES ($1, $2, $3, TRUE, TRUE, $4, NULL, $5, $6)
            ",
        )
        .bind(channel.id.into_inner())
        .bind(&channel.name)
        .bind(&channel.description)
        .bind(creator.into_inner())
        .bind(channel.created_at)
        .bind(channel.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        Self::insert_membership(&mut tx, channel.id, creator, true)
            .await
            .map_err(map_db_error)?;

        for &member_id in member_ids {
            Self::insert_membership(&mut tx, channel.id, member_id, false)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    async fn update(&self, channel: &Channel) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE channels
            SET name = $2, description = $3, is_active = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(channel.id.into_inner())
        .bind(&channel.name)
        .bind(&channel.description)
        .bind(channel.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(channel_not_found(channel.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE channels
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(channel_not_found(id));
        }

        Ok(())
    }
}

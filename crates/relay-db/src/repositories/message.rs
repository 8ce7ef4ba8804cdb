//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::Message;
use relay_core::traits::{MessagePage, MessageQuery, MessageRepository, RepoResult};
use relay_core::value_objects::Snowflake;

use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found};

const MESSAGE_COLUMNS: &str = "id, channel_id, user_id, content, attachment, attachment_type, \
     created_at, updated_at, edited_at, deleted_at";

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_by_channel(
        &self,
        channel_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<MessagePage> {
        let limit = query.limit.clamp(1, 100);

        // Fetch one extra row to detect whether another page exists.
        let mut results = match (query.before, query.after) {
            (Some(before), _) => {
                // Scrolling up: messages older than the cursor
                sqlx::query_as::<_, MessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages \
                     WHERE channel_id = $1 AND id < $2 AND deleted_at IS NULL \
                     ORDER BY id DESC \
                     LIMIT $3"
                ))
                .bind(channel_id.into_inner())
                .bind(before.into_inner())
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(after)) => {
                // Scrolling down: messages newer than the cursor
                sqlx::query_as::<_, MessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages \
                     WHERE channel_id = $1 AND id > $2 AND deleted_at IS NULL \
                     ORDER BY id DESC \
                     LIMIT $3"
                ))
                .bind(channel_id.into_inner())
                .bind(after.into_inner())
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await
            }
            (None, None) => {
                // Latest page
                sqlx::query_as::<_, MessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages \
                     WHERE channel_id = $1 AND deleted_at IS NULL \
                     ORDER BY id DESC \
                     LIMIT $2"
                ))
                .bind(channel_id.into_inner())
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        let has_more = results.len() as i64 > limit;
        results.truncate(limit as usize);

        Ok(MessagePage {
            messages: results.into_iter().map(Message::from).collect(),
            has_more,
        })
    }

    #[instrument(skip(self, channel_ids), fields(count = channel_ids.len()))]
    async fn find_latest_per_channel(
        &self,
        channel_ids: &[Snowflake],
    ) -> RepoResult<Vec<Message>> {
        if channel_ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = channel_ids.iter().copied().map(Snowflake::into_inner).collect();

        let results = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT DISTINCT ON (channel_id) {MESSAGE_COLUMNS} \
             FROM messages \
             WHERE channel_id = ANY($1) AND deleted_at IS NULL \
             ORDER BY channel_id, id DESC"
        ))
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id, channel_id = %message.channel_id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO messages
                (id, channel_id, user_id, content, attachment, attachment_type,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.channel_id.into_inner())
        .bind(message.user_id.into_inner())
        .bind(&message.content)
        .bind(&message.attachment)
        .bind(&message.attachment_type)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // GREATEST keeps the activity timestamp monotonic when inserts
        // commit out of order.
        sqlx::query(
            r"
            UPDATE channels
            SET last_message_at = GREATEST(COALESCE(last_message_at, 'epoch'::TIMESTAMPTZ), $2),
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(message.channel_id.into_inner())
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn update(&self, message: &Message) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET content = $2, edited_at = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(message.id.into_inner())
        .bind(&message.content)
        .bind(message.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(message.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn unread_counts(&self, user_id: Snowflake) -> RepoResult<Vec<(Snowflake, i64)>> {
        let results = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT m.channel_id, COUNT(*)
            FROM messages m
            JOIN channel_members cm ON cm.channel_id = m.channel_id AND cm.user_id = $1
            JOIN channels c ON c.id = m.channel_id AND c.deleted_at IS NULL
            WHERE m.user_id != $1
              AND m.deleted_at IS NULL
              AND (cm.last_read_at IS NULL OR m.created_at > cm.last_read_at)
            GROUP BY m.channel_id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results
            .into_iter()
            .map(|(channel_id, count)| (Snowflake::new(channel_id), count))
            .collect())
    }
}

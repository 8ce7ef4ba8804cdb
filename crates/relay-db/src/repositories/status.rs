//! PostgreSQL implementation of StatusRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::Status;
use relay_core::traits::{RepoResult, StatusRepository};
use relay_core::value_objects::Snowflake;

use crate::models::StatusModel;

use super::error::map_db_error;

/// PostgreSQL implementation of StatusRepository
#[derive(Clone)]
pub struct PgStatusRepository {
    pool: PgPool,
}

impl PgStatusRepository {
    /// Create a new PgStatusRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusRepository for PgStatusRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Status>> {
        let result = sqlx::query_as::<_, StatusModel>(
            r"
            SELECT id, name, color, icon, is_available, sort_order, created_at, updated_at
            FROM statuses
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Status::from))
    }

    #[instrument(skip(self))]
    async fn list_available(&self) -> RepoResult<Vec<Status>> {
        let results = sqlx::query_as::<_, StatusModel>(
            r"
            SELECT id, name, color, icon, is_available, sort_order, created_at, updated_at
            FROM statuses
            WHERE is_available = TRUE
            ORDER BY sort_order, name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Status::from).collect())
    }
}

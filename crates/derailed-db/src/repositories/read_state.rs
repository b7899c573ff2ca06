//! PostgreSQL implementation of ReadStateRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use derailed_core::{ReadState, ReadStateRepository, RepoResult, Snowflake};

use super::error::map_db_error;
use crate::models::ReadStateModel;

/// PostgreSQL implementation of ReadStateRepository
#[derive(Clone)]
pub struct PgReadStateRepository {
    pool: PgPool,
}

impl PgReadStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadStateRepository for PgReadStateRepository {
    #[instrument(skip(self, guild_ids), fields(guilds = guild_ids.len()))]
    async fn find_for_user(
        &self,
        user_id: Snowflake,
        guild_ids: &[Snowflake],
    ) -> RepoResult<Vec<ReadState>> {
        let guild_ids: Vec<i64> = guild_ids.iter().map(|id| id.into_inner()).collect();

        // Direct channels have no guild and are always included
        let rows = sqlx::query_as::<_, ReadStateModel>(
            r"
            SELECT rs.channel_id, rs.last_message_id, rs.mentions
            FROM read_states rs
            JOIN channels c ON c.id = rs.channel_id
            WHERE rs.user_id = $1
              AND (c.guild_id IS NULL OR c.guild_id = ANY($2))
            ORDER BY rs.channel_id
            ",
        )
        .bind(user_id.into_inner())
        .bind(&guild_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ReadState::from).collect())
    }
}

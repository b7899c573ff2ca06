//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use derailed_core::{MemberRepository, RepoResult, Snowflake};

use super::error::map_db_error;

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn guild_ids_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r"
            SELECT guild_id
            FROM guild_members
            WHERE user_id = $1
            ORDER BY guild_id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }
}

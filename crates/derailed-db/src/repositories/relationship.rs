//! PostgreSQL implementation of RelationshipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use derailed_core::{RelationshipRepository, Relationship, RepoResult, Snowflake};

use super::error::map_db_error;
use crate::models::RelationshipModel;

/// PostgreSQL implementation of RelationshipRepository
#[derive(Clone)]
pub struct PgRelationshipRepository {
    pool: PgPool,
}

impl PgRelationshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationshipRepository for PgRelationshipRepository {
    #[instrument(skip(self))]
    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Relationship>> {
        let rows = sqlx::query_as::<_, RelationshipModel>(
            r"
            SELECT target_user_id, type
            FROM relationships
            WHERE origin_user_id = $1
            ORDER BY target_user_id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Relationship::try_from).collect()
    }
}

//! PostgreSQL implementation of DeviceRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use derailed_core::{Device, DeviceRepository, RepoResult, Snowflake};

use super::error::map_db_error;
use crate::models::DeviceModel;

/// PostgreSQL implementation of DeviceRepository
#[derive(Clone)]
pub struct PgDeviceRepository {
    pool: PgPool,
}

impl PgDeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceRepository for PgDeviceRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Device>> {
        let result = sqlx::query_as::<_, DeviceModel>(
            r"
            SELECT id, user_id
            FROM devices
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Device::from))
    }
}

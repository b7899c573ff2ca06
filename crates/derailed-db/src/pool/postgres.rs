//! PostgreSQL pool construction and migrations

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::path::Path;
use std::time::Duration;

/// Pool sizing and timeouts
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl PoolSettings {
    /// Settings for `url` with the gateway's defaults
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
        }
    }

    pub fn connections(mut self, min: u32, max: u32) -> Self {
        self.min_connections = min.min(max);
        self.max_connections = max;
        self
    }
}

/// Open a pool; the first connection is established eagerly
pub async fn create_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .connect(&settings.url)
        .await?;

    tracing::debug!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "PostgreSQL pool ready"
    );
    Ok(pool)
}

/// Apply the SQL migrations found in `dir` (e.g. this crate's `migrations/`)
pub async fn run_migrations(pool: &PgPool, dir: &Path) -> Result<(), MigrateError> {
    let migrator = Migrator::new(dir).await?;
    migrator.run(pool).await?;

    tracing::info!(migrations = migrator.iter().count(), "Database migrations applied");

    Ok(())
}

//! MySQL connection pool setup.

use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use tracing::info;

use quill_shared::config::DatabaseConfig;

/// Create a MySQL connection pool from the database configuration.
///
/// Every storage call through this pool carries the configured acquire
/// timeout, so no repository operation can block indefinitely; a timeout
/// surfaces as a transient error to the caller.
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .max_lifetime(Duration::from_secs(config.max_lifetime))
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "database pool created");
    Ok(pool)
}

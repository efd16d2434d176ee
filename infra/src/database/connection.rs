//! MySQL connection pool setup.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use sv_shared::config::DatabaseConfig;

/// Create a connection pool from configuration.
///
/// Fails fast: the pool connects eagerly so a bad URL surfaces at startup,
/// not on the first request.
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database connection pool established"
    );

    Ok(pool)
}

//! Database setup and initialization

use anyhow::{Context, Result};
use ftrack_core::Config;
use ftrack_db::{connect_options, MIGRATOR};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<SqlitePool> {
    tracing::info!("Connecting to database...");
    let timeout = Duration::from_secs(config.db_timeout_seconds);
    let options =
        connect_options(&config.database_url, timeout).context("Invalid DATABASE_URL")?;

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

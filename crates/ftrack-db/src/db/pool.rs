//! Connection options shared by the server and tests

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use std::str::FromStr;
use std::time::Duration;

/// SQLite options for a pooled, concurrently written database.
///
/// WAL lets readers run alongside the single writer. `busy_timeout` bounds how long
/// a writer queues for the lock before the request fails.
pub fn connect_options(
    database_url: &str,
    busy_timeout: Duration,
) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(busy_timeout))
}

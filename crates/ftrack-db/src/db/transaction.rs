//! Database transaction utilities
//!
//! Every multi-statement operation on the store goes through `with_transaction`
//! or `with_write_transaction` so a failure part way leaves nothing behind.

use ftrack_core::AppError;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::future::Future;
use std::pin::Pin;

/// How a transaction takes its SQLite lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransactionMode {
    /// `BEGIN`: no lock until the first statement. Reads only.
    Deferred,
    /// `BEGIN IMMEDIATE`: takes the write lock up front, waiting out `busy_timeout`.
    /// A deferred transaction that reads and then writes fails with `SQLITE_BUSY`
    /// as soon as another writer holds the lock.
    Immediate,
}

/// Execute a read-only closure within a deferred database transaction
///
/// Commits when the closure returns `Ok`, rolls back otherwise.
///
/// # Example
///
/// ```ignore
/// with_transaction(&pool, |tx| {
///     Box::pin(async move {
///         let a = sqlx::query("SELECT ...").fetch_all(&mut **tx).await?;
///         let b = sqlx::query("SELECT ...").fetch_all(&mut **tx).await?;
///         Ok::<_, AppError>((a, b))
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<T, F>(pool: &SqlitePool, f: F) -> Result<T, AppError>
where
    F: for<'a> FnOnce(
        &'a mut Transaction<'_, Sqlite>,
    ) -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>,
{
    run_in_transaction(pool, TransactionMode::Deferred, f).await
}

/// Execute a closure that writes within an immediate database transaction
pub async fn with_write_transaction<T, F>(pool: &SqlitePool, f: F) -> Result<T, AppError>
where
    F: for<'a> FnOnce(
        &'a mut Transaction<'_, Sqlite>,
    ) -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>,
{
    run_in_transaction(pool, TransactionMode::Immediate, f).await
}

async fn run_in_transaction<T, F>(
    pool: &SqlitePool,
    mode: TransactionMode,
    f: F,
) -> Result<T, AppError>
where
    F: for<'a> FnOnce(
        &'a mut Transaction<'_, Sqlite>,
    ) -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>,
{
    let begun = match mode {
        TransactionMode::Deferred => pool.begin().await,
        TransactionMode::Immediate => pool.begin_with("BEGIN IMMEDIATE").await,
    };
    let mut tx = begun.map_err(|e| {
        tracing::error!(error = %e, mode = ?mode, "Failed to begin transaction");
        AppError::Database(e)
    })?;

    match f(&mut tx).await {
        Ok(result) => {
            tx.commit().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to commit transaction");
                AppError::Database(e)
            })?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(
                    error = %rollback_err,
                    original_error = %e,
                    "Failed to rollback transaction"
                );
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE items (name TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_commits_on_success() {
        let pool = pool().await;
        let inserted = with_transaction(&pool, |tx| {
            Box::pin(async move {
                sqlx::query("INSERT INTO items (name) VALUES ('a')")
                    .execute(&mut **tx)
                    .await?;
                Ok::<_, AppError>(1)
            })
        })
        .await
        .unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_rolls_back_on_error() {
        let pool = pool().await;
        let result: Result<(), AppError> = with_transaction(&pool, |tx| {
            Box::pin(async move {
                sqlx::query("INSERT INTO items (name) VALUES ('a')")
                    .execute(&mut **tx)
                    .await?;
                Err::<(), _>(AppError::Internal("boom".to_string()))
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_write_transaction_commits() {
        let pool = pool().await;
        with_write_transaction(&pool, |tx| {
            Box::pin(async move {
                let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
                    .fetch_one(&mut **tx)
                    .await?;
                sqlx::query("INSERT INTO items (name) VALUES (?)")
                    .bind(format!("item-{}", existing))
                    .execute(&mut **tx)
                    .await?;
                Ok::<_, AppError>(())
            })
        })
        .await
        .unwrap();
        assert_eq!(count(&pool).await, 1);
    }
}

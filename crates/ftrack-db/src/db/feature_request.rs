use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use ftrack_core::{
    models::{
        FeatureRequest, FeatureRequestRow, FeatureStatus, ListSort, NewFeatureRequest,
        StatusChange,
    },
    AppError, FeatureRequestStore,
};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::transaction::{with_transaction, with_write_transaction};

const FEATURE_REQUEST_COLUMNS: &str =
    "id, title, description, status, created_by, created_at, updated_at";
const STATUS_CHANGE_COLUMNS: &str =
    "id, feature_request_id, old_status, new_status, changed_at, changed_by";

/// Repository for feature requests and their status history
#[derive(Clone)]
pub struct FeatureRequestRepository {
    pool: SqlitePool,
}

impl FeatureRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn fetch_row(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<FeatureRequestRow>, sqlx::Error> {
    sqlx::query_as::<Sqlite, FeatureRequestRow>(&format!(
        "SELECT {} FROM feature_requests WHERE id = ?",
        FEATURE_REQUEST_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

// Oldest first; rowid breaks ties between changes recorded in the same instant.
async fn fetch_history(
    conn: &mut SqliteConnection,
    feature_request_id: Uuid,
) -> Result<Vec<StatusChange>, sqlx::Error> {
    sqlx::query_as::<Sqlite, StatusChange>(&format!(
        "SELECT {} FROM status_changes WHERE feature_request_id = ? ORDER BY changed_at ASC, rowid ASC",
        STATUS_CHANGE_COLUMNS
    ))
    .bind(feature_request_id)
    .fetch_all(conn)
    .await
}

async fn list_in_tx(
    conn: &mut SqliteConnection,
    list_sql: String,
    history_sql: String,
) -> Result<Vec<FeatureRequest>, AppError> {
    let rows = sqlx::query_as::<Sqlite, FeatureRequestRow>(&list_sql)
        .fetch_all(&mut *conn)
        .await?;
    let changes = sqlx::query_as::<Sqlite, StatusChange>(&history_sql)
        .fetch_all(&mut *conn)
        .await?;

    let mut history: HashMap<Uuid, Vec<StatusChange>> = HashMap::new();
    for change in changes {
        history
            .entry(change.feature_request_id)
            .or_default()
            .push(change);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let entries = history.remove(&row.id).unwrap_or_default();
            FeatureRequest::from_row(row, entries)
        })
        .collect())
}

async fn get_in_tx(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<FeatureRequest>, AppError> {
    let Some(row) = fetch_row(&mut *conn, id).await? else {
        return Ok(None);
    };
    let history = fetch_history(&mut *conn, id).await?;
    Ok(Some(FeatureRequest::from_row(row, history)))
}

// The status write and its history row commit together or not at all.
async fn update_status_in_tx(
    conn: &mut SqliteConnection,
    id: Uuid,
    status: FeatureStatus,
    changed_by: String,
) -> Result<Option<FeatureRequest>, AppError> {
    let Some(mut row) = fetch_row(&mut *conn, id).await? else {
        return Ok(None);
    };

    let now = Utc::now();
    sqlx::query("UPDATE feature_requests SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(&format!(
        "INSERT INTO status_changes ({}) VALUES (?, ?, ?, ?, ?, ?)",
        STATUS_CHANGE_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(id)
    .bind(row.status)
    .bind(status)
    .bind(now)
    .bind(&changed_by)
    .execute(&mut *conn)
    .await?;

    row.status = status;
    row.updated_at = now;
    let history = fetch_history(&mut *conn, id).await?;
    Ok(Some(FeatureRequest::from_row(row, history)))
}

async fn delete_in_tx(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, AppError> {
    sqlx::query("DELETE FROM status_changes WHERE feature_request_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM feature_requests WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl FeatureRequestStore for FeatureRequestRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "feature_requests", db.operation = "insert"))]
    async fn create(&self, new: NewFeatureRequest) -> Result<FeatureRequest, AppError> {
        let now = Utc::now();
        let row = FeatureRequestRow {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            status: FeatureStatus::New,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(&format!(
            "INSERT INTO feature_requests ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            FEATURE_REQUEST_COLUMNS
        ))
        .bind(row.id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.status)
        .bind(&row.created_by)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(FeatureRequest::from_row(row, Vec::new()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "feature_requests", db.operation = "select"))]
    async fn list(&self, sort: ListSort) -> Result<Vec<FeatureRequest>, AppError> {
        // Column and direction come from closed enums, never from raw input.
        let direction = sort.order.keyword();
        let list_sql = format!(
            "SELECT {} FROM feature_requests ORDER BY {} {}, rowid {}",
            FEATURE_REQUEST_COLUMNS,
            sort.field.column(),
            direction,
            direction
        );
        let history_sql = format!(
            "SELECT {} FROM status_changes ORDER BY changed_at ASC, rowid ASC",
            STATUS_CHANGE_COLUMNS
        );

        with_transaction(&self.pool, move |tx| {
            Box::pin(list_in_tx(&mut **tx, list_sql, history_sql))
        })
        .await
    }

    #[tracing::instrument(skip(self), fields(db.table = "feature_requests", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<FeatureRequest>, AppError> {
        with_transaction(&self.pool, move |tx| Box::pin(get_in_tx(&mut **tx, id))).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "feature_requests", db.operation = "update", db.record_id = %id))]
    async fn update_status(
        &self,
        id: Uuid,
        status: FeatureStatus,
        changed_by: &str,
    ) -> Result<Option<FeatureRequest>, AppError> {
        let changed_by = changed_by.to_string();
        with_write_transaction(&self.pool, move |tx| {
            Box::pin(update_status_in_tx(&mut **tx, id, status, changed_by))
        })
        .await
    }

    #[tracing::instrument(skip(self), fields(db.table = "feature_requests", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        with_write_transaction(&self.pool, move |tx| Box::pin(delete_in_tx(&mut **tx, id))).await
    }
}

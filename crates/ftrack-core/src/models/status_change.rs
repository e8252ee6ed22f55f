use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::feature_request::FeatureStatus;

/// Immutable audit record of one status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174001")]
    pub id: Uuid,
    /// Feature request this status change belongs to
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub feature_request_id: Uuid,
    pub old_status: FeatureStatus,
    pub new_status: FeatureStatus,
    pub changed_at: DateTime<Utc>,
    /// Identity of the caller who changed the status
    #[schema(example = "current-user")]
    pub changed_by: String,
}

use std::borrow::Cow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::status_change::StatusChange;

/// Lifecycle status of a feature request.
///
/// Any status may move to any other (or to itself); NEW is the only initial state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Rejected,
}

impl FeatureStatus {
    pub const ALL: [FeatureStatus; 4] = [
        FeatureStatus::New,
        FeatureStatus::InProgress,
        FeatureStatus::Completed,
        FeatureStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl Display for FeatureStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown status '{}'", s))
    }
}

/// Feature request with its full status history, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequest {
    /// Unique identifier for the feature request
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: Uuid,
    /// Title of the feature request
    #[schema(example = "Add dark mode support")]
    pub title: String,
    /// Detailed description of the feature request
    #[schema(example = "Implement dark mode for better user experience in low-light environments")]
    pub description: Option<String>,
    pub status: FeatureStatus,
    /// Identity of the caller who created the feature request
    #[schema(example = "current-user")]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Status changes, oldest first
    pub status_history: Vec<StatusChange>,
}

impl FeatureRequest {
    pub fn from_row(row: FeatureRequestRow, status_history: Vec<StatusChange>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            status_history,
        }
    }
}

/// Database row for the feature_requests table (history lives in status_changes).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct FeatureRequestRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: FeatureStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new feature request.
#[derive(Debug, Clone)]
pub struct NewFeatureRequest {
    pub title: String,
    pub description: Option<String>,
    pub created_by: String,
}

/// Request DTO for creating a feature request
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct CreateFeatureRequestRequest {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 255, message = "Title must be between 1 and 255 characters")
    )]
    #[schema(example = "Add dark mode support", min_length = 1, max_length = 255)]
    pub title: Option<String>,
    #[serde(default)]
    #[schema(example = "Implement dark mode for better user experience in low-light environments")]
    pub description: Option<String>,
}

/// Request DTO for changing the status of a feature request
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateStatusRequest {
    #[validate(
        required(message = "Status is required"),
        custom(function = "validate_status")
    )]
    #[schema(example = "IN_PROGRESS")]
    pub status: Option<String>,
}

impl UpdateStatusRequest {
    /// Parsed status; only meaningful after validation succeeded.
    pub fn parsed_status(&self) -> Option<FeatureStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

#[allow(clippy::ptr_arg)] // validator hands custom rules the inner `&String`
fn validate_status(value: &String) -> Result<(), ValidationError> {
    value.parse::<FeatureStatus>().map(|_| ()).map_err(|_| {
        ValidationError::new("status").with_message(Cow::Borrowed(
            "Status must be one of: NEW, IN_PROGRESS, COMPLETED, REJECTED",
        ))
    })
}

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SortField {
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "status")]
    Status,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Status => "status",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "status" => Ok(Self::Status),
            other => Err(format!("Unknown sort field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unknown sort order '{}'", other)),
        }
    }
}

/// Resolved ordering for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for ListSort {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Query parameters for listing feature requests
#[derive(Debug, Clone, Default, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ListFeatureRequestsQuery {
    /// Field to sort by: `createdAt` or `status`
    #[validate(custom(function = "validate_sort_by"))]
    #[param(example = "createdAt")]
    pub sort_by: Option<String>,
    /// Sort direction: `asc` or `desc`
    #[validate(custom(function = "validate_sort_order"))]
    #[param(example = "desc")]
    pub sort_order: Option<String>,
}

impl ListFeatureRequestsQuery {
    /// Without `sort_by` the listing is newest first; an explicit field without an
    /// explicit order sorts ascending.
    pub fn to_sort(&self) -> ListSort {
        let Some(field) = self.sort_by.as_deref().and_then(|s| s.parse().ok()) else {
            return ListSort::default();
        };
        let order = self
            .sort_order
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(SortOrder::Asc);
        ListSort { field, order }
    }
}

#[allow(clippy::ptr_arg)] // validator hands custom rules the inner `&String`
fn validate_sort_by(value: &String) -> Result<(), ValidationError> {
    value.parse::<SortField>().map(|_| ()).map_err(|_| {
        ValidationError::new("sort_by")
            .with_message(Cow::Borrowed("sort_by must be one of: createdAt, status"))
    })
}

#[allow(clippy::ptr_arg)] // validator hands custom rules the inner `&String`
fn validate_sort_order(value: &String) -> Result<(), ValidationError> {
    value.parse::<SortOrder>().map(|_| ()).map_err(|_| {
        ValidationError::new("sort_order")
            .with_message(Cow::Borrowed("sort_order must be one of: asc, desc"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_payload;

    #[test]
    fn test_status_labels_round_trip() {
        for status in FeatureStatus::ALL {
            assert_eq!(status.as_str().parse::<FeatureStatus>(), Ok(status));
        }
        assert!("BOGUS".parse::<FeatureStatus>().is_err());
        assert!("new".parse::<FeatureStatus>().is_err());
        assert_eq!(FeatureStatus::default(), FeatureStatus::New);
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&FeatureStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn test_create_request_requires_title() {
        let req: CreateFeatureRequestRequest =
            serde_json::from_str(r#"{"description":"no title"}"#).unwrap();
        let errors = validate_payload(&req).unwrap_err();
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "Title is required");
    }

    #[test]
    fn test_create_request_rejects_empty_and_long_titles() {
        let empty = CreateFeatureRequestRequest {
            title: Some(String::new()),
            description: None,
        };
        assert_eq!(validate_payload(&empty).unwrap_err()[0].field, "title");

        let long = CreateFeatureRequestRequest {
            title: Some("x".repeat(256)),
            description: None,
        };
        assert_eq!(validate_payload(&long).unwrap_err()[0].field, "title");

        let max = CreateFeatureRequestRequest {
            title: Some("x".repeat(255)),
            description: None,
        };
        assert!(validate_payload(&max).is_ok());
    }

    #[test]
    fn test_update_status_request() {
        let ok = UpdateStatusRequest {
            status: Some("COMPLETED".to_string()),
        };
        assert!(validate_payload(&ok).is_ok());
        assert_eq!(ok.parsed_status(), Some(FeatureStatus::Completed));

        let bogus = UpdateStatusRequest {
            status: Some("BOGUS".to_string()),
        };
        let errors = validate_payload(&bogus).unwrap_err();
        assert_eq!(errors[0].field, "status");

        let missing = UpdateStatusRequest { status: None };
        assert_eq!(validate_payload(&missing).unwrap_err()[0].field, "status");
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListFeatureRequestsQuery::default();
        assert!(validate_payload(&query).is_ok());
        assert_eq!(query.to_sort(), ListSort::default());
        assert_eq!(query.to_sort().order, SortOrder::Desc);
    }

    #[test]
    fn test_list_query_explicit_field_sorts_ascending() {
        let query = ListFeatureRequestsQuery {
            sort_by: Some("status".to_string()),
            sort_order: None,
        };
        assert_eq!(
            query.to_sort(),
            ListSort {
                field: SortField::Status,
                order: SortOrder::Asc
            }
        );
    }

    #[test]
    fn test_list_query_rejects_unknown_values() {
        let query = ListFeatureRequestsQuery {
            sort_by: Some("title".to_string()),
            sort_order: Some("sideways".to_string()),
        };
        let errors = validate_payload(&query).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["sort_by", "sort_order"]);
    }
}

//! Error types module
//!
//! All failures in the tracker are unified under the `AppError` enum. Each variant
//! self-describes how it should be presented over HTTP through the `ErrorMetadata`
//! trait, so the transport layer renders every error the same way.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

use crate::validation::FieldError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected writes the client can fix
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether internal details must stay out of the response body
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for a validation failure on a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    /// Field-level details, present only for validation failures.
    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            AppError::Validation(errors) if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }

    /// Get the error type name for logs
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::InvalidJson(_) => "InvalidJson",
            AppError::AuthenticationRequired(_) => "AuthenticationRequired",
            AppError::InvalidCredentials(_) => "InvalidCredentials",
            AppError::NotFound(_) => "NotFound",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }

    /// Constraint violations are the client's fault; everything else from the store is ours.
    #[cfg(feature = "sqlx")]
    fn is_constraint_violation(&self) -> bool {
        match self {
            AppError::Database(SqlxError::Database(db_err)) => {
                db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation()
            }
            _ => false,
        }
    }

    #[cfg(not(feature = "sqlx"))]
    fn is_constraint_violation(&self) -> bool {
        false
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(crate::validation::field_errors(&err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Validation(_) => (400, "VALIDATION_ERROR", false, LogLevel::Debug),
        AppError::InvalidJson(_) => (400, "INVALID_JSON", false, LogLevel::Debug),
        AppError::AuthenticationRequired(_) => {
            (401, "AUTHENTICATION_REQUIRED", false, LogLevel::Debug)
        }
        AppError::InvalidCredentials(_) => (401, "INVALID_CREDENTIALS", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "RESOURCE_NOT_FOUND", false, LogLevel::Debug),
        AppError::Database(_) if err.is_constraint_violation() => {
            (400, "DATABASE_ERROR", true, LogLevel::Warn)
        }
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_SERVER_ERROR", true, LogLevel::Error)
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::InvalidJson(ref msg) => msg.clone(),
            AppError::AuthenticationRequired(ref msg) => msg.clone(),
            AppError::InvalidCredentials(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "An unexpected error occurred".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_validation() {
        let err = AppError::field("title", "Title is required");
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.client_message(), "Validation failed");
        assert_eq!(err.log_level(), LogLevel::Debug);
        let details = err.details().expect("validation errors carry details");
        assert_eq!(details[0].field, "title");
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Feature request not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "RESOURCE_NOT_FOUND");
        assert_eq!(err.client_message(), "Feature request not found");
        assert!(err.details().is_none());
        assert!(!err.is_sensitive());
    }

    #[test]
    fn test_error_metadata_auth() {
        let missing = AppError::AuthenticationRequired("API key is required".to_string());
        assert_eq!(missing.http_status_code(), 401);
        assert_eq!(missing.error_code(), "AUTHENTICATION_REQUIRED");

        let invalid = AppError::InvalidCredentials("Invalid API key".to_string());
        assert_eq!(invalid.http_status_code(), 401);
        assert_eq!(invalid.error_code(), "INVALID_CREDENTIALS");
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_error_metadata_database() {
        let err = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "A database error occurred");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_internal_hides_message() {
        let err = AppError::from(anyhow::anyhow!("connection string leaked"));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "INTERNAL_SERVER_ERROR");
        assert!(!err.client_message().contains("leaked"));
        assert!(err.detailed_message().contains("leaked"));
    }

    #[test]
    fn test_empty_validation_has_no_details() {
        let err = AppError::Validation(Vec::new());
        assert!(err.details().is_none());
    }
}

//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Every failure, whether
//! raised by an extractor, the auth middleware or the service, is rendered here into
//! the same `{code, message, details?}` envelope.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use ftrack_core::validation::validate_payload;
use ftrack_core::{AppError, ErrorMetadata, FieldError, LogLevel};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
    /// Human-readable error message
    #[schema(example = "Validation failed")]
    pub message: String,
    /// Per-field failures, present only for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// Sensitive errors keep only their code and generic client message.
    fn from_app_error(error: &AppError) -> Self {
        if error.is_sensitive() {
            return Self {
                code: error.error_code().to_string(),
                message: error.client_message(),
                details: None,
            };
        }
        Self {
            code: error.error_code().to_string(),
            message: error.client_message(),
            details: error.details().map(<[FieldError]>::to_vec),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from ftrack-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Malformed bodies are `INVALID_JSON`; well-formed bodies of the wrong shape are
/// validation failures.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                AppError::Validation(vec![data_error_detail(&err.body_text())])
            }
            JsonRejection::JsonSyntaxError(_) => {
                AppError::InvalidJson("Invalid JSON in request body".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => AppError::InvalidJson(
                "Expected request with `Content-Type: application/json`".to_string(),
            ),
            other => AppError::InvalidJson(other.body_text()),
        };
        HttpAppError(error)
    }
}

impl From<QueryRejection> for HttpAppError {
    fn from(rejection: QueryRejection) -> Self {
        HttpAppError(AppError::field("query", rejection.body_text()))
    }
}

/// Pull the offending field out of a deserialization message such as
/// `Failed to deserialize ...: title: invalid type: integer `5`, expected a string`.
fn data_error_detail(body_text: &str) -> FieldError {
    let detail = body_text
        .split_once(": ")
        .map_or(body_text, |(_, rest)| rest);
    match detail.split_once(": ") {
        Some((path, message))
            if !path.is_empty() && path != "." && !path.contains(char::is_whitespace) =>
        {
            FieldError::new(path, message)
        }
        _ => FieldError::new("body", detail),
    }
}

/// JSON body extractor that deserializes and then runs the payload's `Validate` rules.
/// Handlers behind it never see an invalid payload.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        validate_payload(&inner).map_err(|errors| HttpAppError(AppError::Validation(errors)))?;
        Ok(ValidatedJson(inner))
    }
}

/// Query string counterpart of `ValidatedJson`.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(inner) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(HttpAppError::from)?;
        validate_payload(&inner).map_err(|errors| HttpAppError(AppError::Validation(errors)))?;
        Ok(ValidatedQuery(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(ErrorResponse::from_app_error(app_error))).into_response()
    }
}

/// Fallback for unmatched routes.
pub async fn not_found_fallback() -> HttpAppError {
    HttpAppError(AppError::NotFound("Route not found".to_string()))
}

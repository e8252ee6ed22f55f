//! Validation helpers
//!
//! Request DTOs declare their rules with `validator` derives. This module turns
//! the library's error tree into the flat per-field list the API returns.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// A single offending field in a rejected payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Field that caused the error
    #[schema(example = "title")]
    pub field: String,
    /// Error message for the field
    #[schema(example = "Title is required")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten `ValidationErrors` into one entry per offending field, sorted by field name.
///
/// When a field breaks several rules only the first message is kept.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Run the declared rules of `payload` and return the per-field failures, if any.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), Vec<FieldError>> {
    payload.validate().map_err(|e| field_errors(&e))
}

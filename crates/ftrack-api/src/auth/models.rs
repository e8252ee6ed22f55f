use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ftrack_core::AppError;

/// Resolved identity of whoever issued the request; attributed to every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub id: String,
}

impl CallerIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Why a credential was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("API key is required")]
    MissingCredential,
    #[error("Invalid API key")]
    InvalidCredential,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential => AppError::AuthenticationRequired(err.to_string()),
            AuthError::InvalidCredential => AppError::InvalidCredentials(err.to_string()),
        }
    }
}

// Populated by `auth_middleware`; absent only when a route skipped the middleware.
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| HttpAppError(AuthError::MissingCredential.into()))
    }
}

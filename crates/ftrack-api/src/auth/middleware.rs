use crate::auth::resolver::IdentityResolver;
use crate::constants::API_KEY_HEADER;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub resolver: Arc<dyn IdentityResolver>,
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let credential = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    match auth_state.resolver.resolve(credential.as_deref()).await {
        Ok(identity) => {
            tracing::debug!(caller = %identity.id, "Request authenticated");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(reason) => {
            // Never log the presented key.
            tracing::warn!(
                reason = %reason,
                method = %request.method(),
                path = %request.uri().path(),
                "Authentication failed"
            );
            HttpAppError(reason.into()).into_response()
        }
    }
}

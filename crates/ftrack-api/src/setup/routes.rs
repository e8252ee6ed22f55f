//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::{auth_middleware, AuthState, DevIdentityResolver, IdentityResolver, StaticKeyResolver};
use crate::constants::{API_PREFIX, DOCS_PATH, OPENAPI_JSON_PATH};
use crate::error::not_found_fallback;
use crate::handlers;
use crate::middleware::{request_id_middleware, RequestId};
use crate::state::AppState;
use axum::{
    body::Body,
    http::{HeaderValue, Method, Request},
    routing::{get, put},
    Json, Router,
};
use ftrack_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(setup_auth(config));

    let protected_routes = protected_routes().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let app = public_routes()
        .merge(protected_routes)
        .fallback(not_found_fallback)
        .with_state(state)
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path(DOCS_PATH))
        .layer(cors)
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if config.cors_origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any))
}

/// Pick the identity resolver for this environment.
fn setup_auth(config: &Config) -> AuthState {
    let resolver: Arc<dyn IdentityResolver> = if config.dev_auth_bypass() {
        Arc::new(DevIdentityResolver)
    } else {
        Arc::new(StaticKeyResolver::new(&config.api_keys))
    };
    AuthState { resolver }
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            OPENAPI_JSON_PATH,
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}

/// Protected routes (require authentication).
fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/feature-requests", API_PREFIX),
            get(handlers::feature_requests::list_feature_requests)
                .post(handlers::feature_requests::create_feature_request),
        )
        .route(
            &format!("{}/feature-requests/{{id}}", API_PREFIX),
            get(handlers::feature_requests::get_feature_request)
                .delete(handlers::feature_requests::delete_feature_request),
        )
        .route(
            &format!("{}/feature-requests/{{id}}/status", API_PREFIX),
            put(handlers::feature_requests::update_feature_request_status),
        )
}

//! OpenAPI documentation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::constants::API_KEY_HEADER;
use crate::error::ErrorResponse;
use crate::handlers;
use ftrack_core::models;
use ftrack_core::FieldError;

/// Registers the `x-api-key` header scheme referenced by the protected paths.
struct ApiKeySecurity;

impl Modify for ApiKeySecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Feature Request Tracker API",
        version = "1.0.0",
        description = "Create, list, inspect, re-status and delete feature requests. Every status change is kept as an audit history entry."
    ),
    paths(
        handlers::feature_requests::create_feature_request,
        handlers::feature_requests::list_feature_requests,
        handlers::feature_requests::get_feature_request,
        handlers::feature_requests::update_feature_request_status,
        handlers::feature_requests::delete_feature_request,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::FeatureRequest,
            models::StatusChange,
            models::FeatureStatus,
            models::CreateFeatureRequestRequest,
            models::UpdateStatusRequest,
            ErrorResponse,
            FieldError,
            handlers::health::HealthResponse,
        )
    ),
    modifiers(&ApiKeySecurity),
    tags(
        (name = "feature-requests", description = "Feature request lifecycle"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

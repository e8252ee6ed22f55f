use crate::auth::CallerIdentity;
use crate::constants::FEATURE_REQUEST_NOT_FOUND;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use ftrack_core::models::{
    CreateFeatureRequestRequest, FeatureRequest, ListFeatureRequestsQuery, NewFeatureRequest,
    UpdateStatusRequest,
};
use ftrack_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Ids that are not UUIDs cannot name a stored request.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(FEATURE_REQUEST_NOT_FOUND.to_string()))
}

#[utoipa::path(
    post,
    path = "/api/feature-requests",
    tag = "feature-requests",
    request_body = CreateFeatureRequestRequest,
    responses(
        (status = 201, description = "Feature request created", body = FeatureRequest),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[tracing::instrument(
    skip(state, payload),
    fields(caller = %caller.id, operation = "create_feature_request")
)]
pub async fn create_feature_request(
    caller: CallerIdentity,
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateFeatureRequestRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let title = payload
        .title
        .ok_or_else(|| AppError::field("title", "Title is required"))?;

    let created = state
        .feature_requests
        .create(NewFeatureRequest {
            title,
            description: payload.description,
            created_by: caller.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/feature-requests",
    tag = "feature-requests",
    params(ListFeatureRequestsQuery),
    responses(
        (status = 200, description = "All feature requests with their history", body = Vec<FeatureRequest>),
        (status = 400, description = "Invalid sort parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, _caller), fields(operation = "list_feature_requests"))]
pub async fn list_feature_requests(
    _caller: CallerIdentity,
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ListFeatureRequestsQuery>,
) -> Result<Json<Vec<FeatureRequest>>, HttpAppError> {
    let records = state.feature_requests.list(query.to_sort()).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/feature-requests/{id}",
    tag = "feature-requests",
    params(
        ("id" = Uuid, Path, description = "Feature request ID")
    ),
    responses(
        (status = 200, description = "Feature request with its history", body = FeatureRequest),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Feature request not found", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[tracing::instrument(skip(state, _caller), fields(operation = "get_feature_request"))]
pub async fn get_feature_request(
    _caller: CallerIdentity,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FeatureRequest>, HttpAppError> {
    let id = parse_id(&id)?;
    let record = state.feature_requests.get(id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    put,
    path = "/api/feature-requests/{id}/status",
    tag = "feature-requests",
    params(
        ("id" = Uuid, Path, description = "Feature request ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = FeatureRequest),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Feature request not found", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[tracing::instrument(
    skip(state, payload),
    fields(caller = %caller.id, operation = "update_feature_request_status")
)]
pub async fn update_feature_request_status(
    caller: CallerIdentity,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<FeatureRequest>, HttpAppError> {
    let status = payload
        .parsed_status()
        .ok_or_else(|| AppError::field("status", "Status is required"))?;
    let id = parse_id(&id)?;

    let updated = state
        .feature_requests
        .update_status(id, status, &caller.id)
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/feature-requests/{id}",
    tag = "feature-requests",
    params(
        ("id" = Uuid, Path, description = "Feature request ID")
    ),
    responses(
        (status = 204, description = "Feature request deleted"),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Feature request not found", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(caller = %caller.id, operation = "delete_feature_request")
)]
pub async fn delete_feature_request(
    caller: CallerIdentity,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let id = parse_id(&id)?;
    state.feature_requests.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

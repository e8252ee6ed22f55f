//! Health, documentation and fallback routes.
//!
//! Run with: `cargo test -p ftrack-api --test public_routes_test`

mod helpers;

use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_health_check_reports_closed_database() {
    let app = setup_test_app().await;
    app.pool().close().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 503);
    assert_eq!(response.json::<Value>()["database"], "disconnected");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_test_app().await;

    let response = app.client().get("/api-docs.json").await;

    assert_eq!(response.status_code(), 200);
    let doc = response.json::<Value>();
    assert_eq!(doc["info"]["title"], "Feature Request Tracker API");
    assert!(doc["paths"]["/api/feature-requests/{id}"]["delete"].is_object());
    assert!(doc["components"]["schemas"]["StatusChange"].is_object());
    assert!(doc["components"]["securitySchemes"]["api_key"].is_object());
}

#[tokio::test]
async fn test_docs_ui_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api-docs").await;

    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("/api-docs.json"));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = setup_test_app().await;

    let response = app.client().get("/nope").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.json::<Value>()["code"], "RESOURCE_NOT_FOUND");
}

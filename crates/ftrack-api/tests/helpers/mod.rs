//! Test helpers: build AppState and router for integration tests.
//!
//! Each test app gets its own in-memory SQLite database with migrations applied.
//! `setup_file_backed_test_app` instead opens a multi-connection pool on a temp file
//! through the server's own `setup_database`.
//! Run from workspace root: `cargo test -p ftrack-api`.

#![allow(dead_code)]

use axum_test::{TestResponse, TestServer};
use ftrack_api::constants::{API_KEY_HEADER, API_PREFIX};
use ftrack_api::setup::{database, routes};
use ftrack_api::state::AppState;
use ftrack_core::{Config, NoOpObserver};
use ftrack_db::MIGRATOR;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Built-in key from the default configuration.
pub const TEST_API_KEY: &str = "default-api-key";
/// Extra key registered for a second caller.
pub const OTHER_API_KEY: &str = "alice-test-key";
pub const OTHER_CALLER: &str = "alice";

/// API path prefix for tests (e.g. `/api/feature-requests`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Test application: server and pool.
pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
    // Keeps a file-backed database alive for the test's duration.
    _db_dir: Option<tempfile::TempDir>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a feature request as the default caller and return the response body.
    pub async fn create_feature_request(&self, title: &str, description: Option<&str>) -> Value {
        let mut body = json!({ "title": title });
        if let Some(description) = description {
            body["description"] = json!(description);
        }
        let response = self
            .server
            .post(&api_path("/feature-requests"))
            .add_header(API_KEY_HEADER, TEST_API_KEY)
            .json(&body)
            .await;
        assert_eq!(response.status_code(), 201);
        response.json::<Value>()
    }

    pub async fn update_status(&self, id: &str, status: &str) -> TestResponse {
        self.server
            .put(&api_path(&format!("/feature-requests/{}/status", id)))
            .add_header(API_KEY_HEADER, TEST_API_KEY)
            .json(&json!({ "status": status }))
            .await
    }

    pub async fn get_feature_request(&self, id: &str) -> TestResponse {
        self.server
            .get(&api_path(&format!("/feature-requests/{}", id)))
            .add_header(API_KEY_HEADER, TEST_API_KEY)
            .await
    }
}

/// Production-like configuration: API keys are enforced.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config
        .api_keys
        .insert(OTHER_API_KEY.to_string(), OTHER_CALLER.to_string());
    config
}

/// Setup test app with an isolated database and API-key auth.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_config(create_test_config()).await
}

pub async fn setup_test_app_with_config(config: Config) -> TestApp {
    // A single connection that never expires keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    build_test_app(config, pool, None)
}

/// Test app over a file database with the default pool size, opened like the server does.
pub async fn setup_file_backed_test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = create_test_config();
    config.database_url = format!("sqlite://{}", dir.path().join("ftrack.db").display());

    let pool = database::setup_database(&config)
        .await
        .expect("Failed to open file database");

    build_test_app(config, pool, Some(dir))
}

fn build_test_app(config: Config, pool: SqlitePool, db_dir: Option<tempfile::TempDir>) -> TestApp {
    let state = Arc::new(AppState::new(pool.clone(), Arc::new(NoOpObserver)));
    let router = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        pool,
        _db_dir: db_dir,
    }
}

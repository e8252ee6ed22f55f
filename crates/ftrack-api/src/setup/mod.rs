//! Application setup and initialization
//!
//! Startup is split out of main.rs so integration tests can build the same router.

pub mod database;
pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use ftrack_core::{Config, TracingObserver};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(config).context("Configuration validation failed")?;
    tracing::info!(environment = %config.environment, "Configuration loaded and validated successfully");

    let pool = database::setup_database(config).await?;

    let state = Arc::new(AppState::new(pool, Arc::new(TracingObserver)));

    let router = routes::setup_routes(config, state.clone())?;

    Ok((state, router))
}

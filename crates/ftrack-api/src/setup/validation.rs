//! Configuration validation
//!
//! Hard errors come from `Config::validate`; risky but legal settings are logged here.

use anyhow::Result;
use ftrack_core::{Config, DEFAULT_API_KEY};

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!(
            "CORS allows all origins (*) in production; set CORS_ORIGINS to restrict it"
        );
    }

    if config.dev_auth_bypass() {
        tracing::warn!(
            "Development mode: API keys are not checked and every request acts as the default caller"
        );
    } else if config.is_production() && config.api_keys.contains_key(DEFAULT_API_KEY) {
        tracing::warn!("The built-in default API key is accepted in production");
    }

    Ok(())
}

//! Configuration module
//!
//! Settings are read from the process environment (after loading an optional `.env`
//! file). Every value has a default so a bare `ftrack-api` starts against a local
//! SQLite file.

use std::collections::BTreeMap;
use std::env;

const SERVER_HOST: &str = "0.0.0.0";
const SERVER_PORT: u16 = 3000;
const DATABASE_URL: &str = "sqlite://feature_requests.db?mode=rwc";
const MAX_CONNECTIONS: u32 = 5;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Built-in API key, always accepted unless the table is replaced in code.
pub const DEFAULT_API_KEY: &str = "default-api-key";
/// Caller identity attributed to the built-in key and to development requests.
pub const DEFAULT_CALLER_ID: &str = "current-user";

/// Console log rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, anyhow::Error> {
        match value.trim().to_lowercase().as_str() {
            "compact" | "" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'compact' or 'json', got '{}'",
                other
            )),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    /// Force API-key authentication even in development.
    pub require_auth: bool,
    /// API key -> caller identity.
    pub api_keys: BTreeMap<String, String>,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        let mut api_keys = BTreeMap::new();
        api_keys.insert(DEFAULT_API_KEY.to_string(), DEFAULT_CALLER_ID.to_string());
        Self {
            server_host: SERVER_HOST.to_string(),
            server_port: SERVER_PORT,
            database_url: DATABASE_URL.to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            environment: "production".to_string(),
            require_auth: false,
            api_keys,
            cors_origins: vec!["*".to_string()],
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let server_port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {}", e))?,
            None => defaults.server_port,
        };

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.db_max_connections);

        let db_timeout_seconds = lookup("DB_TIMEOUT_SECONDS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(defaults.db_timeout_seconds);

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);

        let require_auth = lookup("REQUIRE_AUTH")
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let mut api_keys = defaults.api_keys;
        if let Some(key) = lookup("API_KEY").filter(|k| !k.trim().is_empty()) {
            api_keys.insert(key.trim().to_string(), DEFAULT_CALLER_ID.to_string());
        }
        if let Some(pairs) = lookup("API_KEYS") {
            for pair in pairs.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (key, caller) = pair.split_once(':').ok_or_else(|| {
                    anyhow::anyhow!("API_KEYS entries must look like key:caller, got '{}'", pair)
                })?;
                api_keys.insert(key.trim().to_string(), caller.trim().to_string());
            }
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw)?,
            None => defaults.log_format,
        };

        Ok(Config {
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections,
            db_timeout_seconds,
            environment,
            require_auth,
            api_keys,
            cors_origins,
            log_format,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }
        if self.database_url.trim().is_empty() {
            return Err(anyhow::anyhow!("DATABASE_URL must not be empty"));
        }
        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than 0"));
        }
        if self.api_keys.is_empty() {
            return Err(anyhow::anyhow!("At least one API key must be configured"));
        }
        if self
            .api_keys
            .iter()
            .any(|(key, caller)| key.is_empty() || caller.is_empty())
        {
            return Err(anyhow::anyhow!(
                "API keys and their caller identities must not be empty"
            ));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }

    pub fn is_development(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "development" | "dev"
        )
    }

    /// Development mode without `REQUIRE_AUTH` attributes every request to the default caller.
    pub fn dev_auth_bypass(&self) -> bool {
        self.is_development() && !self.require_auth
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.database_url, DATABASE_URL);
        assert!(config.is_production());
        assert!(!config.dev_auth_bypass());
        assert_eq!(
            config.api_keys.get(DEFAULT_API_KEY).map(String::as_str),
            Some(DEFAULT_CALLER_ID)
        );
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_KEY", "env-key"),
            ("API_KEYS", "alice-key:alice, bob-key:bob"),
        ]))
        .unwrap();
        assert_eq!(config.api_keys.len(), 4);
        assert_eq!(config.api_keys["env-key"], DEFAULT_CALLER_ID);
        assert_eq!(config.api_keys["alice-key"], "alice");
        assert_eq!(config.api_keys["bob-key"], "bob");
    }

    #[test]
    fn test_malformed_api_keys_rejected() {
        let result = Config::from_lookup(lookup_from(&[("API_KEYS", "no-separator")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_dev_bypass_requires_development_without_require_auth() {
        let dev = Config::from_lookup(lookup_from(&[("ENVIRONMENT", "development")])).unwrap();
        assert!(dev.dev_auth_bypass());

        let forced = Config::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "development"),
            ("REQUIRE_AUTH", "true"),
        ]))
        .unwrap();
        assert!(!forced.dev_auth_bypass());
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).is_err());

        let zero_port = Config::from_lookup(lookup_from(&[("PORT", "0")])).unwrap();
        assert!(zero_port.validate().is_err());

        let no_keys = Config {
            api_keys: BTreeMap::new(),
            ..Config::default()
        };
        assert!(no_keys.validate().is_err());
    }

    #[test]
    fn test_cors_and_bind_addr() {
        let config = Config::from_lookup(lookup_from(&[
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
            ("SERVER_HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.log_format, LogFormat::Json);
    }
}

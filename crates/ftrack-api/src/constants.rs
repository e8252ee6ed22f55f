//! API constants

/// Prefix for every feature request route.
pub const API_PREFIX: &str = "/api";

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header used to correlate a request across logs and responses.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const FEATURE_REQUEST_NOT_FOUND: &str = "Feature request not found";

/// Path of the served OpenAPI document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs.json";

/// Path of the interactive documentation UI.
pub const DOCS_PATH: &str = "/api-docs";

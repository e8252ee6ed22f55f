//! API-key authentication
//!
//! `auth_middleware` resolves the `x-api-key` header through an injected
//! `IdentityResolver` and stores the resulting `CallerIdentity` in the request
//! extensions, where handlers pick it up as an extractor.

pub mod middleware;
pub mod models;
pub mod resolver;

pub use middleware::{auth_middleware, AuthState};
pub use models::{AuthError, CallerIdentity};
pub use resolver::{DevIdentityResolver, IdentityResolver, StaticKeyResolver};

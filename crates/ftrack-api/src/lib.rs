//! Feature tracker HTTP API
//!
//! Handlers, authentication, middleware and application setup for the feature
//! request service.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
pub mod state;
mod telemetry;

pub use error::ErrorResponse;

//! Feature tracker core library
//!
//! Domain models, error types, configuration, validation and the storage and
//! observer seams shared by the database and API crates.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, LogFormat, DEFAULT_API_KEY, DEFAULT_CALLER_ID};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{EventAttributes, EventObserver, NoOpObserver, TracingObserver};
pub use store::FeatureRequestStore;
pub use validation::FieldError;

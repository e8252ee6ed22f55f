//! Feature tracker persistence
//!
//! SQLite-backed implementation of `ftrack_core::FeatureRequestStore` and the
//! embedded schema migrations.

pub mod db;

pub use db::{connect_options, with_transaction, with_write_transaction, FeatureRequestRepository};

/// Schema migrations from the workspace `migrations/` directory, embedded at build time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

//! Database repositories for data access layer
//
// Feature request repository (store implementation)
pub mod feature_request;
//
// Connection options
pub mod pool;
//
// Transaction utilities
pub mod transaction;

pub use feature_request::FeatureRequestRepository;
pub use pool::connect_options;
pub use transaction::{with_transaction, with_write_transaction};

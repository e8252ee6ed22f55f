mod feature_request;
mod status_change;

pub use feature_request::*;
pub use status_change::*;

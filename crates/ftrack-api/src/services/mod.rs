pub mod feature_requests;

pub use feature_requests::FeatureRequestService;

pub mod feature_requests;
pub mod health;

//! Application state shared by all handlers.

use crate::services::FeatureRequestService;
use ftrack_core::{EventObserver, FeatureRequestStore};
use ftrack_db::FeatureRequestRepository;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub feature_requests: FeatureRequestService,
}

impl AppState {
    /// Wire the SQLite-backed store and the given observer into the service.
    pub fn new(pool: SqlitePool, observer: Arc<dyn EventObserver>) -> Self {
        let store: Arc<dyn FeatureRequestStore> =
            Arc::new(FeatureRequestRepository::new(pool.clone()));
        Self {
            pool,
            feature_requests: FeatureRequestService::new(store, observer),
        }
    }
}

//! Feature request lifecycle
//!
//! Owns the not-found contract and event reporting; persistence and atomicity are
//! delegated to the injected `FeatureRequestStore`.

use crate::constants::FEATURE_REQUEST_NOT_FOUND;
use ftrack_core::hooks::{
    FEATURE_REQUEST_CREATED, FEATURE_REQUEST_DELETED, FEATURE_REQUEST_STATUS_CHANGED,
};
use ftrack_core::models::{FeatureRequest, FeatureStatus, ListSort, NewFeatureRequest};
use ftrack_core::{AppError, EventAttributes, EventObserver, FeatureRequestStore};
use std::sync::Arc;
use uuid::Uuid;

fn not_found() -> AppError {
    AppError::NotFound(FEATURE_REQUEST_NOT_FOUND.to_string())
}

#[derive(Clone)]
pub struct FeatureRequestService {
    store: Arc<dyn FeatureRequestStore>,
    observer: Arc<dyn EventObserver>,
}

impl FeatureRequestService {
    pub fn new(store: Arc<dyn FeatureRequestStore>, observer: Arc<dyn EventObserver>) -> Self {
        Self { store, observer }
    }

    /// Create a request in status `NEW` attributed to `new.created_by`.
    pub async fn create(&self, new: NewFeatureRequest) -> Result<FeatureRequest, AppError> {
        let created = self.store.create(new).await?;

        self.observer.record(
            FEATURE_REQUEST_CREATED,
            &EventAttributes::from([
                ("id", created.id.to_string()),
                ("created_by", created.created_by.clone()),
            ]),
        );

        Ok(created)
    }

    pub async fn list(&self, sort: ListSort) -> Result<Vec<FeatureRequest>, AppError> {
        self.store.list(sort).await
    }

    pub async fn get(&self, id: Uuid) -> Result<FeatureRequest, AppError> {
        self.store.get(id).await?.ok_or_else(not_found)
    }

    /// Move a request to `status`, recording the transition. Self-transitions are recorded too.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: FeatureStatus,
        changed_by: &str,
    ) -> Result<FeatureRequest, AppError> {
        let updated = self
            .store
            .update_status(id, status, changed_by)
            .await?
            .ok_or_else(not_found)?;

        let old_status = updated
            .status_history
            .last()
            .map(|change| change.old_status.to_string())
            .unwrap_or_default();
        self.observer.record(
            FEATURE_REQUEST_STATUS_CHANGED,
            &EventAttributes::from([
                ("id", id.to_string()),
                ("old_status", old_status),
                ("new_status", status.to_string()),
                ("changed_by", changed_by.to_string()),
            ]),
        );

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(not_found());
        }

        self.observer.record(
            FEATURE_REQUEST_DELETED,
            &EventAttributes::from([("id", id.to_string())]),
        );

        Ok(())
    }
}

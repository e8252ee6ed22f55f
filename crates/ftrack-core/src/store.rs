//! Persistence seam for feature requests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{FeatureRequest, FeatureStatus, ListSort, NewFeatureRequest};

/// Storage for feature requests and their status history.
///
/// Every returned `FeatureRequest` carries its full history, oldest first.
#[async_trait]
pub trait FeatureRequestStore: Send + Sync {
    /// Insert a request with status `NEW` and an empty history.
    async fn create(&self, new: NewFeatureRequest) -> Result<FeatureRequest, AppError>;

    async fn list(&self, sort: ListSort) -> Result<Vec<FeatureRequest>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<FeatureRequest>, AppError>;

    /// Change the status and append one history entry atomically.
    ///
    /// Returns `None` when no request has this id; nothing is written in that case.
    async fn update_status(
        &self,
        id: Uuid,
        status: FeatureStatus,
        changed_by: &str,
    ) -> Result<Option<FeatureRequest>, AppError>;

    /// Remove the request and its history. Returns `false` when the id was unknown.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

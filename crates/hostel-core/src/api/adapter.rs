//! The remote store seam between resource managers and a backend.

use async_trait::async_trait;

use super::{ApiError, ApiResult};
use crate::models::{Record, RecordId};

/// Result of `ResourceAdapter::save`, telling which verb was used.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<T> {
    /// POST succeeded; carries the record with its server-assigned id.
    Created(T),
    /// PUT completed; `false` means the store reported nothing was updated.
    Updated(bool),
}

/// CRUD access to one resource collection.
///
/// Implementors provide the four primitive calls. `save` and `delete`
/// layer the id-based dispatch on top so every adapter picks the verb the
/// same way and never attempts a delete without an identifier.
#[async_trait]
pub trait ResourceAdapter<T: Record>: Send + Sync {
    /// Fetch the entire collection. No server-side filtering is assumed.
    async fn fetch_all(&self) -> ApiResult<Vec<T>>;

    /// Persist a record that has no identifier yet.
    async fn create(&self, record: &T) -> ApiResult<T>;

    /// Replace the stored record with the given identifier.
    async fn update(&self, id: &RecordId, record: &T) -> ApiResult<bool>;

    /// Remove the stored record with the given identifier.
    async fn delete_by_id(&self, id: &RecordId) -> ApiResult<bool>;

    /// Create when the record has no identifier, update otherwise.
    async fn save(&self, record: &T) -> ApiResult<SaveOutcome<T>> {
        match record.persisted_id() {
            None => self.create(record).await.map(SaveOutcome::Created),
            Some(id) => self.update(id, record).await.map(SaveOutcome::Updated),
        }
    }

    /// Delete by identifier, failing fast when there is none.
    async fn delete(&self, id: Option<&RecordId>) -> ApiResult<bool> {
        match id.filter(|id| !id.is_empty()) {
            Some(id) => self.delete_by_id(id).await,
            None => Err(ApiError::MissingIdentifier(T::LABEL)),
        }
    }
}

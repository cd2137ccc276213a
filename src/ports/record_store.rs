//! Record store port.
//!
//! Persists health records scoped per profile. Writes are whole-record
//! appends or replacements keyed by id.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ProfileId, RecordId};
use crate::domain::record::HealthRecord;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// - `Duplicate` if a record with the same id exists
    async fn append(&self, record: &HealthRecord) -> Result<(), RecordStoreError>;

    /// Replaces an existing record.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record doesn't exist
    async fn update(&self, record: &HealthRecord) -> Result<(), RecordStoreError>;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record doesn't exist
    async fn remove(&self, id: RecordId) -> Result<(), RecordStoreError>;

    /// Finds a record by id.
    async fn find(&self, id: RecordId) -> Result<Option<HealthRecord>, RecordStoreError>;

    /// Lists a profile's records, newest first.
    async fn list_by_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<HealthRecord>, RecordStoreError>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordStoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("record {0} already exists")]
    Duplicate(RecordId),

    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn RecordStore) {}
    }
}

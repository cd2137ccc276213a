//! In-memory record store.
//!
//! Holds records for the lifetime of the process. Used by the CLI and
//! tests; a durable store would implement the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ProfileId, RecordId};
use crate::domain::record::{newest_first, HealthRecord};
use crate::ports::{RecordStore, RecordStoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<RecordId, HealthRecord>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<(), RecordStoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RecordStoreError::Storage("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn append(&self, record: &HealthRecord) -> Result<(), RecordStoreError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id()) {
            return Err(RecordStoreError::Duplicate(record.id()));
        }
        records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &HealthRecord) -> Result<(), RecordStoreError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        match records.get_mut(&record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(RecordStoreError::NotFound(record.id())),
        }
    }

    async fn remove(&self, id: RecordId) -> Result<(), RecordStoreError> {
        self.check_writable()?;
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RecordStoreError::NotFound(id))
    }

    async fn find(&self, id: RecordId) -> Result<Option<HealthRecord>, RecordStoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_by_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<HealthRecord>, RecordStoreError> {
        let mut matched: Vec<HealthRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.profile_id() == profile_id)
            .cloned()
            .collect();
        newest_first(&mut matched);
        Ok(matched)
    }
}

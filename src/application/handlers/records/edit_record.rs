//! EditRecordHandler - applies a user edit to a record's editable fields.

use std::sync::Arc;

use super::RecordAccessError;
use crate::domain::foundation::{ProfileId, RecordId};
use crate::domain::record::{HealthRecord, RecordEdit};
use crate::ports::RecordStore;

#[derive(Debug, Clone)]
pub struct EditRecordCommand {
    pub profile_id: ProfileId,
    pub record_id: RecordId,
    pub edit: RecordEdit,
}

pub struct EditRecordHandler {
    store: Arc<dyn RecordStore>,
}

impl EditRecordHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: EditRecordCommand) -> Result<HealthRecord, RecordAccessError> {
        // 1. Load, scoped to the profile
        let mut record = self
            .store
            .find(cmd.record_id)
            .await?
            .filter(|r| r.profile_id() == &cmd.profile_id)
            .ok_or(RecordAccessError::NotFound(cmd.record_id))?;

        if cmd.edit.is_empty() {
            return Ok(record);
        }

        // 2. Apply; a rejected edit changes nothing
        record.apply(cmd.edit)?;

        // 3. Replace
        self.store.update(&record).await?;
        tracing::debug!(record_id = %record.id(), profile_id = %record.profile_id(), "record edited");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRecordStore;
    use crate::domain::foundation::ValidationError;
    use crate::domain::record::RecordKind;

    fn profile(id: &str) -> ProfileId {
        ProfileId::new(id).unwrap()
    }

    async fn setup() -> (EditRecordHandler, InMemoryRecordStore, HealthRecord) {
        let store = InMemoryRecordStore::new();
        let record =
            HealthRecord::new(profile("p-1"), RecordKind::Symptom, "Rash", "Red patch").unwrap();
        store.append(&record).await.unwrap();
        (EditRecordHandler::new(Arc::new(store.clone())), store, record)
    }

    #[tokio::test]
    async fn edits_notes_and_persists() {
        let (handler, store, record) = setup().await;

        handler
            .handle(EditRecordCommand {
                profile_id: profile("p-1"),
                record_id: record.id(),
                edit: RecordEdit::new().notes("Better after cream"),
            })
            .await
            .unwrap();

        let stored = store.find(record.id()).await.unwrap().unwrap();
        assert_eq!(stored.notes(), Some("Better after cream"));
        assert_eq!(stored.summary(), "Rash");
    }

    #[tokio::test]
    async fn blank_summary_is_rejected_without_changes() {
        let (handler, store, record) = setup().await;

        let err = handler
            .handle(EditRecordCommand {
                profile_id: profile("p-1"),
                record_id: record.id(),
                edit: RecordEdit::new().summary(" ").notes("x"),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RecordAccessError::Validation(ValidationError::empty_field("summary"))
        );
        assert_eq!(store.find(record.id()).await.unwrap().unwrap(), record);
    }

    #[tokio::test]
    async fn other_profile_cannot_edit() {
        let (handler, _, record) = setup().await;

        let err = handler
            .handle(EditRecordCommand {
                profile_id: profile("p-2"),
                record_id: record.id(),
                edit: RecordEdit::new().notes("x"),
            })
            .await
            .unwrap_err();

        assert_eq!(err, RecordAccessError::NotFound(record.id()));
    }
}

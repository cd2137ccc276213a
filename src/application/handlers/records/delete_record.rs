//! DeleteRecordHandler - explicit user delete.

use std::sync::Arc;

use super::RecordAccessError;
use crate::domain::foundation::{ProfileId, RecordId};
use crate::ports::RecordStore;

#[derive(Debug, Clone)]
pub struct DeleteRecordCommand {
    pub profile_id: ProfileId,
    pub record_id: RecordId,
}

pub struct DeleteRecordHandler {
    store: Arc<dyn RecordStore>,
}

impl DeleteRecordHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: DeleteRecordCommand) -> Result<(), RecordAccessError> {
        let owned = self
            .store
            .find(cmd.record_id)
            .await?
            .map_or(false, |r| r.profile_id() == &cmd.profile_id);
        if !owned {
            return Err(RecordAccessError::NotFound(cmd.record_id));
        }

        self.store.remove(cmd.record_id).await?;
        tracing::info!(record_id = %cmd.record_id, profile_id = %cmd.profile_id, "record deleted");
        Ok(())
    }
}

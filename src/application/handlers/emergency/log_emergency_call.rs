//! LogEmergencyCallHandler - records an emergency call placed from the
//! critical alert or the contacts list.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::emergency::EMERGENCY_NUMBER;
use crate::domain::foundation::{ProfileId, ValidationError};
use crate::domain::record::HealthRecord;
use crate::ports::{RecordStore, RecordStoreError};

#[derive(Debug, Clone)]
pub struct LogEmergencyCallCommand {
    pub profile_id: ProfileId,
    pub number: String,
    /// E.g. the triage question answered "yes".
    pub reason: Option<String>,
}

impl LogEmergencyCallCommand {
    /// A call to the public emergency number.
    pub fn emergency_services(profile_id: ProfileId) -> Self {
        Self {
            profile_id,
            number: EMERGENCY_NUMBER.to_string(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LogEmergencyCallError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Store(#[from] RecordStoreError),
}

pub struct LogEmergencyCallHandler {
    store: Arc<dyn RecordStore>,
}

impl LogEmergencyCallHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: LogEmergencyCallCommand,
    ) -> Result<HealthRecord, LogEmergencyCallError> {
        let record =
            HealthRecord::emergency_call(cmd.profile_id, &cmd.number, cmd.reason.as_deref())?;
        self.store.append(&record).await?;

        tracing::info!(
            profile_id = %record.profile_id(),
            record_id = %record.id(),
            number = %cmd.number.trim(),
            "emergency call logged"
        );
        Ok(record)
    }
}

//! Health record timeline handlers.

mod delete_record;
mod edit_record;
mod list_timeline;

use thiserror::Error;

use crate::domain::foundation::{RecordId, ValidationError};
use crate::ports::RecordStoreError;

pub use delete_record::{DeleteRecordCommand, DeleteRecordHandler};
pub use edit_record::{EditRecordCommand, EditRecordHandler};
pub use list_timeline::{ListTimelineHandler, ListTimelineQuery};

/// Errors from record commands and queries.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordAccessError {
    /// Missing, or owned by another profile.
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Store(RecordStoreError),
}

impl From<RecordStoreError> for RecordAccessError {
    fn from(err: RecordStoreError) -> Self {
        match err {
            RecordStoreError::NotFound(id) => RecordAccessError::NotFound(id),
            other => RecordAccessError::Store(other),
        }
    }
}

use serde::{Deserialize, Serialize};

/// A user edit to a record. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEdit {
    pub summary: Option<String>,
    pub details: Option<String>,
    pub notes: Option<String>,
}

impl RecordEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// True when the edit would change nothing.
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.details.is_none() && self.notes.is_none()
    }
}

//! Timeline filtering and ordering.

use super::health_record::{HealthRecord, RecordKind};

/// Filter applied to a profile's records before display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineQuery {
    text: Option<String>,
    kind: Option<RecordKind>,
}

impl TimelineQuery {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Case-insensitive text match against summary, details and notes.
    /// Blank text matches everything.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into().trim().to_lowercase();
        self.text = Some(text).filter(|t| !t.is_empty());
        self
    }

    pub fn kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, record: &HealthRecord) -> bool {
        if let Some(kind) = self.kind {
            if record.kind() != kind {
                return false;
            }
        }

        match &self.text {
            None => true,
            Some(needle) => {
                record.summary().to_lowercase().contains(needle)
                    || record.details().to_lowercase().contains(needle)
                    || record
                        .notes()
                        .map_or(false, |n| n.to_lowercase().contains(needle))
            }
        }
    }

    /// Filters the records and orders them newest first.
    pub fn apply(&self, records: Vec<HealthRecord>) -> Vec<HealthRecord> {
        let mut matched: Vec<HealthRecord> =
            records.into_iter().filter(|r| self.matches(r)).collect();
        newest_first(&mut matched);
        matched
    }
}

/// Sorts records by creation time, newest first. Ties keep their order.
pub fn newest_first(records: &mut [HealthRecord]) {
    records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

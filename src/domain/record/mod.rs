//! Health records: the persisted timeline of a profile.

mod edit;
mod health_record;
mod timeline;

pub use edit::RecordEdit;
pub use health_record::{HealthRecord, RecordKind};
pub use timeline::{newest_first, TimelineQuery};

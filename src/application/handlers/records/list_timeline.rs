//! ListTimelineHandler - a profile's records, filtered, newest first.

use std::sync::Arc;

use super::RecordAccessError;
use crate::domain::foundation::ProfileId;
use crate::domain::record::{HealthRecord, TimelineQuery};
use crate::ports::RecordStore;

#[derive(Debug, Clone)]
pub struct ListTimelineQuery {
    pub profile_id: ProfileId,
    pub filter: TimelineQuery,
}

impl ListTimelineQuery {
    pub fn all(profile_id: ProfileId) -> Self {
        Self {
            profile_id,
            filter: TimelineQuery::all(),
        }
    }

    pub fn search(profile_id: ProfileId, text: impl Into<String>) -> Self {
        Self {
            profile_id,
            filter: TimelineQuery::all().text(text),
        }
    }
}

pub struct ListTimelineHandler {
    store: Arc<dyn RecordStore>,
}

impl ListTimelineHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ListTimelineQuery,
    ) -> Result<Vec<HealthRecord>, RecordAccessError> {
        let records = self.store.list_by_profile(&query.profile_id).await?;
        Ok(query.filter.apply(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRecordStore;
    use crate::domain::foundation::Timestamp;
    use crate::domain::record::RecordKind;

    fn profile() -> ProfileId {
        ProfileId::new("p-1").unwrap()
    }

    async fn seeded() -> ListTimelineHandler {
        let store = InMemoryRecordStore::new();
        let old = HealthRecord::new(profile(), RecordKind::Symptom, "Migraine", "Left side")
            .unwrap()
            .with_created_at(Timestamp::now().plus_secs(-86_400));
        let new = HealthRecord::new(profile(), RecordKind::Note, "Checkup", "")
            .unwrap()
            .with_notes("ask about migraine meds");
        store.append(&old).await.unwrap();
        store.append(&new).await.unwrap();
        ListTimelineHandler::new(Arc::new(store))
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let records = seeded().await.handle(ListTimelineQuery::all(profile())).await.unwrap();
        let summaries: Vec<&str> = records.iter().map(|r| r.summary()).collect();
        assert_eq!(summaries, vec!["Checkup", "Migraine"]);
    }

    #[tokio::test]
    async fn search_matches_notes_case_insensitively() {
        let records = seeded()
            .await
            .handle(ListTimelineQuery::search(profile(), "MIGRAINE"))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);

        let records = seeded()
            .await
            .handle(ListTimelineQuery::search(profile(), "left"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }
}

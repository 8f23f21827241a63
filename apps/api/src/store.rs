//! In-memory analysis store. A `HashMap` behind an async `RwLock` stands in
//! for a database; records live for the lifetime of the process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::records::AnalysisRecord;

/// How many records `list_recent` returns at most.
pub const LIST_LIMIT: usize = 50;

/// Cheaply cloneable handle to the shared record map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    analyses: Arc<RwLock<HashMap<Uuid, AnalysisRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: AnalysisRecord) {
        self.analyses.write().await.insert(record.id, record);
    }

    pub async fn get(&self, id: Uuid) -> Option<AnalysisRecord> {
        self.analyses.read().await.get(&id).cloned()
    }

    /// Most recent first, capped at `LIST_LIMIT`.
    pub async fn list_recent(&self) -> Vec<AnalysisRecord> {
        let map = self.analyses.read().await;
        let mut records: Vec<AnalysisRecord> = map.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(LIST_LIMIT);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOutcome;
    use crate::models::records::AnalysisKind;
    use serde_json::json;

    fn record(kind: AnalysisKind) -> AnalysisRecord {
        AnalysisRecord::new(
            kind,
            &AnalysisOutcome {
                payload: json!({"score": 1}),
                was_repaired: false,
                degraded: false,
            },
        )
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryStore::new();
        let rec = record(AnalysisKind::Review);
        let id = rec.id;
        store.insert(rec).await;

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.kind, AnalysisKind::Review);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let store = MemoryStore::new();
        let older = record(AnalysisKind::Review);
        // Force distinct timestamps regardless of clock resolution.
        let mut newer = record(AnalysisKind::Match);
        newer.created_at = older.created_at + chrono::Duration::seconds(1);

        store.insert(older.clone()).await;
        store.insert(newer.clone()).await;

        let listed = store.list_recent().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn test_clones_share_the_same_map() {
        let store = MemoryStore::new();
        let clone = store.clone();
        let rec = record(AnalysisKind::Rewrite);
        let id = rec.id;
        clone.insert(rec).await;
        assert!(store.get(id).await.is_some());
    }
}

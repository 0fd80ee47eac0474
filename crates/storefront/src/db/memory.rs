//! In-memory record store.
//!
//! Used when no database URL is configured and by the route tests. Data
//! lives as long as the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use corner_shop_core::{Collection, RecordId};

use super::{FindQuery, Record, RecordStore, RepositoryError, SortDirection, compare_values};

#[derive(Default)]
struct Collections {
    last_id: i64,
    records: HashMap<Collection, Vec<Record<Value>>>,
}

/// Process-local record store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.inner
            .read()
            .await
            .records
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(
        &self,
        collection: Collection,
        doc: Value,
    ) -> Result<RecordId, RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = RecordId::new(inner.last_id);

        inner.records.entry(collection).or_default().push(Record {
            id,
            created_at: Utc::now(),
            doc,
        });

        Ok(id)
    }

    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Record<Value>>, RepositoryError> {
        let inner = self.inner.read().await;
        let mut found: Vec<Record<Value>> = inner
            .records
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|record| query.matches(&record.doc))
            .cloned()
            .collect();

        if let Some((field, direction)) = query.sort() {
            found.sort_by(|a, b| {
                let ordering = compare_values(a.doc.get(field), b.doc.get(field))
                    .then_with(|| a.id.as_i64().cmp(&b.id.as_i64()));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        Ok(found)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryRecordStore::new();
        let a = store
            .insert(Collection::Products, json!({"name": "A"}))
            .await
            .unwrap();
        let b = store
            .insert(Collection::Orders, json!({"user": "Guest"}))
            .await
            .unwrap();
        assert!(b.as_i64() > a.as_i64());
        assert_eq!(store.count(Collection::Products).await, 1);
        assert_eq!(store.count(Collection::Orders).await, 1);
    }

    #[tokio::test]
    async fn test_find_filters_within_collection() {
        let store = MemoryRecordStore::new();
        store
            .insert(Collection::Users, json!({"email": "a@x.io"}))
            .await
            .unwrap();
        store
            .insert(Collection::Users, json!({"email": "b@x.io"}))
            .await
            .unwrap();
        store
            .insert(Collection::Contacts, json!({"email": "a@x.io"}))
            .await
            .unwrap();

        let found = store
            .find(Collection::Users, &FindQuery::all().eq("email", "a@x.io"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].doc["email"], "a@x.io");
    }

    #[tokio::test]
    async fn test_find_sorts_descending_with_id_tiebreak() {
        let store = MemoryRecordStore::new();
        for (date, user) in [("2026-01-01", "a"), ("2026-03-01", "b"), ("2026-03-01", "c")] {
            store
                .insert(Collection::Orders, json!({"date": date, "user": user}))
                .await
                .unwrap();
        }

        let found = store
            .find(
                Collection::Orders,
                &FindQuery::all().sort_by("date", SortDirection::Descending),
            )
            .await
            .unwrap();
        let users: Vec<_> = found.iter().map(|r| r.doc["user"].clone()).collect();
        assert_eq!(users, [json!("c"), json!("b"), json!("a")]);
    }

    #[tokio::test]
    async fn test_find_unknown_collection_is_empty() {
        let store = MemoryRecordStore::new();
        let found = store
            .find(Collection::Complaints, &FindQuery::all())
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}

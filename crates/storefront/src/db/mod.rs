//! Record store for the storefront.
//!
//! # Collections
//!
//! Everything the shop persists is a JSON document in one of the
//! [`Collection`]s: `users`, `products`, `orders`, `payments`, `contacts`,
//! `complaints`. The store only needs to insert a document and find
//! documents by field equality, optionally sorted by one field.
//!
//! # Backends
//!
//! - [`postgres::PgRecordStore`] - one JSONB table, `storefront.record`
//! - [`memory::MemoryRecordStore`] - process-local, for development and tests
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p corner-shop-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;
pub mod users;

use std::cmp::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use corner_shop_core::{Collection, Document, RecordId};

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document doesn't match its Rust type, or a value couldn't be encoded.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// A stored document with its store-assigned metadata.
#[derive(Debug, Clone)]
pub struct Record<T> {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub doc: T,
}

/// Sort direction for [`FindQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Which documents to return and in what order.
///
/// Without a sort, documents come back in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    filter: Map<String, Value>,
    sort: Option<(String, SortDirection)>,
}

impl FindQuery {
    /// Match every document.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Only documents whose top-level `field` equals `value`.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.insert(field.to_owned(), value.into());
        self
    }

    /// Order by a top-level field, ties broken by insertion order.
    #[must_use]
    pub fn sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some((field.to_owned(), direction));
        self
    }

    #[must_use]
    pub const fn filter(&self) -> &Map<String, Value> {
        &self.filter
    }

    #[must_use]
    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(f, d)| (f.as_str(), *d))
    }

    /// Whether a document satisfies the equality filter.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        self.filter
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

/// Persistent document collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert one document and return its new id.
    async fn insert(&self, collection: Collection, doc: Value)
    -> Result<RecordId, RepositoryError>;

    /// Find documents in a collection.
    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Record<Value>>, RepositoryError>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Serialize and insert a typed document into its collection.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the document can't be
/// encoded, or the store's error if the insert fails.
pub async fn insert_document<D: Document>(
    store: &dyn RecordStore,
    doc: &D,
) -> Result<RecordId, RepositoryError> {
    let value = serde_json::to_value(doc)
        .map_err(|e| RepositoryError::DataCorruption(format!("failed to encode document: {e}")))?;
    store.insert(D::COLLECTION, value).await
}

/// Find and decode typed documents from their collection.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if a stored document doesn't
/// decode as `D`, or the store's error if the query fails.
pub async fn find_documents<D: Document>(
    store: &dyn RecordStore,
    query: &FindQuery,
) -> Result<Vec<Record<D>>, RepositoryError> {
    let records = store.find(D::COLLECTION, query).await?;
    records
        .into_iter()
        .map(|record| {
            let doc = serde_json::from_value(record.doc).map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid {} document {}: {e}",
                    D::COLLECTION,
                    record.id
                ))
            })?;
            Ok(Record {
                id: record.id,
                created_at: record.created_at,
                doc,
            })
        })
        .collect()
}

/// Order two JSON field values for sorting.
///
/// Numbers compare numerically, strings lexically, and missing values sort
/// first. Mixed types compare equal.
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_find_query_matches_all_filter_fields() {
        let query = FindQuery::all().eq("email", "a@b.c").eq("name", "Ann");

        assert!(query.matches(&json!({"email": "a@b.c", "name": "Ann", "extra": 1})));
        assert!(!query.matches(&json!({"email": "a@b.c", "name": "Bob"})));
        assert!(!query.matches(&json!({"name": "Ann"})));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(FindQuery::all().matches(&json!({})));
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(
            compare_values(Some(&json!(2)), Some(&json!(10))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!("b")), Some(&json!("a"))),
            Ordering::Greater
        );
        assert_eq!(compare_values(None, Some(&json!(1))), Ordering::Less);
    }
}

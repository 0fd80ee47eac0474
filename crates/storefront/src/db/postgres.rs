//! `PostgreSQL` record store.
//!
//! All collections share one table:
//!
//! ```sql
//! storefront.record (
//!     id          BIGSERIAL PRIMARY KEY,
//!     collection  TEXT NOT NULL,
//!     doc         JSONB NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! )
//! ```
//!
//! Equality filters use JSONB containment (`doc @> $filter`), which the GIN
//! index on `doc` serves. Sorting orders by the raw JSONB value of one
//! top-level field, so numbers sort numerically and strings lexically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use corner_shop_core::{Collection, RecordId};

use super::{FindQuery, Record, RecordStore, RepositoryError, SortDirection};

const INSERT_SQL: &str = r"
    INSERT INTO storefront.record (collection, doc)
    VALUES ($1, $2)
    RETURNING id
";

const FIND_SQL: &str = r"
    SELECT id, doc, created_at
    FROM storefront.record
    WHERE collection = $1 AND doc @> $2
    ORDER BY id ASC
";

const FIND_SORTED_ASC_SQL: &str = r"
    SELECT id, doc, created_at
    FROM storefront.record
    WHERE collection = $1 AND doc @> $2
    ORDER BY doc -> $3 ASC NULLS FIRST, id ASC
";

const FIND_SORTED_DESC_SQL: &str = r"
    SELECT id, doc, created_at
    FROM storefront.record
    WHERE collection = $1 AND doc @> $2
    ORDER BY doc -> $3 DESC NULLS LAST, id DESC
";

type RecordRow = (RecordId, Json<Value>, DateTime<Utc>);

/// Record store backed by a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Create a record store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(
        &self,
        collection: Collection,
        doc: Value,
    ) -> Result<RecordId, RepositoryError> {
        let id = sqlx::query_scalar::<_, RecordId>(INSERT_SQL)
            .bind(collection.as_str())
            .bind(Json(doc))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict(format!("duplicate {collection} document"));
                }
                RepositoryError::Database(e)
            })?;

        tracing::debug!(%collection, %id, "Inserted document");
        Ok(id)
    }

    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Record<Value>>, RepositoryError> {
        let filter = Json(Value::Object(query.filter().clone()));

        let rows: Vec<RecordRow> = match query.sort() {
            None => {
                sqlx::query_as(FIND_SQL)
                    .bind(collection.as_str())
                    .bind(filter)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some((field, direction)) => {
                let sql = match direction {
                    SortDirection::Ascending => FIND_SORTED_ASC_SQL,
                    SortDirection::Descending => FIND_SORTED_DESC_SQL,
                };
                sqlx::query_as(sql)
                    .bind(collection.as_str())
                    .bind(filter)
                    .bind(field)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|(id, Json(doc), created_at)| Record {
                id,
                created_at,
                doc,
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

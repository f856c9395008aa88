//! PostgreSQL implementation of the survey store.
//!
//! Column mapping:
//!
//! | Attribute        | Column            | Type    |
//! |------------------|-------------------|---------|
//! | `id`             | `id`              | TEXT PK |
//! | `customerId`     | `customer_id`     | TEXT    |
//! | `surveyText`     | `survey_text`     | TEXT    |
//! | `sentiment`      | `sentiment`       | TEXT    |
//! | `sentimentScore` | `sentiment_score` | JSONB   |
//! | `created_at`     | `created_at`      | TEXT    |
//! | `expires_at`     | `expires_at`      | BIGINT  |

use async_trait::async_trait;
use sqlx::PgPool;

use super::SurveyStore;
use crate::domain::SurveyRecord;
use crate::error::{ExternalService, ProcessingError};

/// PostgreSQL-backed survey store using `sqlx::PgPool`.
///
/// The table name comes from configuration and has already been checked
/// to be a plain identifier, so it is interpolated into the statements.
#[derive(Debug, Clone)]
pub struct PostgresSurveyStore {
    pool: PgPool,
    table: String,
    upsert_sql: String,
}

impl PostgresSurveyStore {
    /// Creates a new store writing to `table` through `pool`.
    #[must_use]
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        let table = table.into();
        let upsert_sql = upsert_sql(&table);
        Self {
            pool,
            table,
            upsert_sql,
        }
    }

    /// Returns the destination table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates the table and its expiry index if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::ExternalService`] on database failure.
    pub async fn ensure_table(&self) -> Result<(), ProcessingError> {
        for statement in schema_sql(&self.table) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(store_error)?;
        }
        tracing::info!(table = %self.table, "survey table ready");
        Ok(())
    }
}

#[async_trait]
impl SurveyStore for PostgresSurveyStore {
    async fn put(&self, record: &SurveyRecord) -> Result<(), ProcessingError> {
        let scores = serde_json::to_value(record.sentiment_score.to_string_map())
            .map_err(|e| ProcessingError::Unexpected(format!("cannot encode scores: {e}")))?;

        sqlx::query(&self.upsert_sql)
            .bind(&record.id)
            .bind(&record.customer_id)
            .bind(&record.survey_text)
            .bind(record.sentiment.as_str())
            .bind(scores)
            .bind(record.created_at_iso())
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(())
    }
}

/// Maps a database error to an external-service error, keeping the
/// SQLSTATE as the provider code.
fn store_error(err: sqlx::Error) -> ProcessingError {
    let code = match &err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        sqlx::Error::PoolTimedOut => Some("PoolTimedOut".to_string()),
        _ => None,
    };
    ProcessingError::external(ExternalService::Store, code, err.to_string())
}

fn upsert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} \
         (id, customer_id, survey_text, sentiment, sentiment_score, created_at, expires_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (id) DO UPDATE SET \
         customer_id = EXCLUDED.customer_id, \
         survey_text = EXCLUDED.survey_text, \
         sentiment = EXCLUDED.sentiment, \
         sentiment_score = EXCLUDED.sentiment_score, \
         created_at = EXCLUDED.created_at, \
         expires_at = EXCLUDED.expires_at"
    )
}

fn schema_sql(table: &str) -> [String; 2] {
    [
        format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
             id TEXT PRIMARY KEY, \
             customer_id TEXT NOT NULL, \
             survey_text TEXT NOT NULL, \
             sentiment TEXT NOT NULL, \
             sentiment_score JSONB NOT NULL, \
             created_at TEXT NOT NULL, \
             expires_at BIGINT NOT NULL)"
        ),
        format!("CREATE INDEX IF NOT EXISTS {table}_expires_at_idx ON {table} (expires_at)"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn upsert_overwrites_on_conflict() {
        let sql = upsert_sql("survey_results");
        assert!(sql.starts_with("INSERT INTO survey_results "));
        assert!(sql.contains("ON CONFLICT (id) DO UPDATE"));
        assert!(sql.contains("expires_at = EXCLUDED.expires_at"));
        assert!(sql.contains("$7"));
    }

    #[test]
    fn schema_has_ttl_column_and_index() {
        let [table, index] = schema_sql("survey_results");
        assert!(table.contains("CREATE TABLE IF NOT EXISTS survey_results"));
        assert!(table.contains("expires_at BIGINT NOT NULL"));
        assert!(index.contains("survey_results_expires_at_idx"));
    }

    #[test]
    fn non_database_errors_have_no_code() {
        let err = store_error(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKind::ExternalService);
        assert_eq!(err.provider_code(), None);
        assert!(err.to_string().starts_with("store error"));
    }

    #[test]
    fn pool_timeout_is_coded() {
        let err = store_error(sqlx::Error::PoolTimedOut);
        assert_eq!(err.provider_code(), Some("PoolTimedOut"));
    }
}

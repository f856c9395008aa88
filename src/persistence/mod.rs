//! Persistence layer: the durable survey store.
//!
//! Provides the [`SurveyStore`] trait for writing enriched survey records.
//! The concrete implementation uses `sqlx::PgPool` for async PostgreSQL
//! access, one row per survey id.

pub mod postgres;

use async_trait::async_trait;

pub use postgres::PostgresSurveyStore;

use crate::domain::SurveyRecord;
use crate::error::ProcessingError;

/// Durable key-value store for enriched surveys.
///
/// Writes are keyed by survey id with overwrite semantics: writing the same
/// id twice replaces the earlier record, and no existence check is made.
/// Expired records are reaped by the store, never by this crate.
#[async_trait]
pub trait SurveyStore: Send + Sync + std::fmt::Debug {
    /// Writes `record`, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::ExternalService`] on storage failure,
    /// carrying the provider error code when one is available.
    async fn put(&self, record: &SurveyRecord) -> Result<(), ProcessingError>;
}

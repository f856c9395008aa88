//! Batch dispatcher: runs the pipeline over every message of a queue
//! batch with per-message failure isolation.

use serde::Serialize;
use tracing::Instrument;

use super::SurveyPipeline;
use crate::domain::{MessageBody, QueueMessage};
use crate::error::ErrorKind;

/// Counts for one processed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Messages that were classified and stored.
    pub processed: usize,
    /// Messages that failed for any reason, empty bodies included.
    pub failed: usize,
    /// Messages in the batch.
    pub total: usize,
    /// Identifiers of the failed messages worth redelivering, in delivery
    /// order. Terminal failures (empty, malformed or invalid messages) are
    /// counted in `failed` but not listed here.
    #[serde(skip)]
    pub retry_message_ids: Vec<String>,
}

impl BatchSummary {
    /// Returns `true` if no message failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    fn record_failure(&mut self, message_id: &str, retryable: bool) {
        self.failed = self.failed.saturating_add(1);
        if retryable {
            self.retry_message_ids.push(message_id.to_string());
        }
    }
}

/// Drives a [`SurveyPipeline`] over queue batches.
///
/// Messages are processed one at a time in delivery order. A failing
/// message is logged and counted, never propagated: the dispatcher always
/// runs the whole batch.
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    pipeline: SurveyPipeline,
}

impl BatchDispatcher {
    /// Creates a dispatcher around `pipeline`.
    #[must_use]
    pub fn new(pipeline: SurveyPipeline) -> Self {
        Self { pipeline }
    }

    /// Returns the underlying pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &SurveyPipeline {
        &self.pipeline
    }

    /// Processes every message of a batch and returns the summary.
    pub async fn dispatch(&self, messages: &[QueueMessage]) -> BatchSummary {
        let batch_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("batch", %batch_id, size = messages.len());
        self.dispatch_inner(messages).instrument(span).await
    }

    async fn dispatch_inner(&self, messages: &[QueueMessage]) -> BatchSummary {
        tracing::info!("processing {} queue message(s)", messages.len());

        let mut summary = BatchSummary {
            total: messages.len(),
            ..BatchSummary::default()
        };

        for message in messages {
            let message_id = message.message_id.as_str();

            let body = match &message.body {
                MessageBody::Text(body) if !body.is_empty() => body,
                MessageBody::Text(_) => {
                    tracing::warn!(message_id, "empty message body, skipping");
                    summary.record_failure(message_id, false);
                    continue;
                }
                MessageBody::NotText(json_type) => {
                    tracing::warn!(
                        message_id,
                        json_type = *json_type,
                        "message body is not a string, skipping"
                    );
                    summary.record_failure(message_id, false);
                    continue;
                }
            };

            match self.pipeline.process(body).await {
                Ok(outcome) => {
                    summary.processed = summary.processed.saturating_add(1);
                    tracing::info!(
                        message_id,
                        survey_id = %outcome.survey_id,
                        sentiment = %outcome.sentiment,
                        "message processed"
                    );
                }
                Err(e) => {
                    let kind = e.kind();
                    match kind {
                        ErrorKind::MalformedInput | ErrorKind::Validation => {
                            tracing::warn!(
                                message_id,
                                error_kind = %kind,
                                error = %e,
                                "message rejected"
                            );
                        }
                        ErrorKind::ExternalService | ErrorKind::Unexpected => {
                            tracing::error!(
                                message_id,
                                error_kind = %kind,
                                error_code = e.provider_code().unwrap_or("Unknown"),
                                error = ?e,
                                "message failed"
                            );
                        }
                    }
                    summary.record_failure(message_id, kind.is_retryable());
                }
            }
        }

        tracing::info!(
            processed = summary.processed,
            failed = summary.failed,
            total = summary.total,
            "batch complete: {} succeeded, {} failed (total: {})",
            summary.processed,
            summary.failed,
            summary.total
        );
        summary
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::classifier::SentimentClassifier;
    use crate::persistence::SurveyStore;
    use crate::service::fakes::{FakeClassifier, MemoryStore};

    fn dispatcher(classifier: &Arc<FakeClassifier>, store: &Arc<MemoryStore>) -> BatchDispatcher {
        let classifier: Arc<dyn SentimentClassifier> = Arc::clone(classifier) as _;
        let store: Arc<dyn SurveyStore> = Arc::clone(store) as _;
        BatchDispatcher::new(SurveyPipeline::new(classifier, store, "en"))
    }

    fn valid(id: &str) -> QueueMessage {
        QueueMessage::new(
            format!("m-{id}"),
            serde_json::json!({"id": id, "customerId": "c1", "surveyText": "Lovely"}).to_string(),
        )
    }

    #[tokio::test]
    async fn counts_successes_and_validation_failures() {
        let classifier = Arc::new(FakeClassifier::default());
        let store = Arc::new(MemoryStore::default());

        let batch = vec![
            valid("s1"),
            QueueMessage::new("m-bad1", r#"{"id":"s2","surveyText":"no customer"}"#),
            valid("s3"),
            QueueMessage::new("m-bad2", r#"{"id":"s4","customerId":"c1","surveyText":"   "}"#),
            valid("s5"),
        ];

        let summary = dispatcher(&classifier, &store).dispatch(&batch).await;
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total, 5);
        // Validation failures are terminal: counted, never redelivered.
        assert!(summary.retry_message_ids.is_empty());
        assert_eq!(classifier.texts().len(), 3);
        assert_eq!(store.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn empty_body_skips_pipeline() {
        let classifier = Arc::new(FakeClassifier::default());
        let store = Arc::new(MemoryStore::default());

        let summary = dispatcher(&classifier, &store)
            .dispatch(&[QueueMessage::new("m-empty", "")])
            .await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processed, 0);
        assert!(summary.retry_message_ids.is_empty());
        assert!(classifier.texts().is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn external_failures_do_not_abort_batch() {
        let classifier = Arc::new(FakeClassifier::default());
        let store = Arc::new(MemoryStore::failing("08006"));

        let batch = vec![valid("s1"), valid("s2"), QueueMessage::new("m-x", "garbage")];
        let summary = dispatcher(&classifier, &store).dispatch(&batch).await;

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.total, 3);
        assert!(!summary.all_succeeded());
        // Store outages are retried; the undecodable body is not.
        assert_eq!(summary.retry_message_ids, vec!["m-s1", "m-s2"]);
        // Both valid messages still reached the classifier.
        assert_eq!(classifier.texts().len(), 2);
    }

    #[tokio::test]
    async fn non_string_body_fails_only_its_message() {
        let classifier = Arc::new(FakeClassifier::default());
        let store = Arc::new(MemoryStore::default());

        let batch = vec![QueueMessage::non_text("m-num", "number"), valid("s2")];
        let summary = dispatcher(&classifier, &store).dispatch(&batch).await;

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.retry_message_ids.is_empty());
        assert_eq!(classifier.texts().len(), 1);
    }

    #[tokio::test]
    async fn messages_are_processed_in_order() {
        let classifier = Arc::new(FakeClassifier::default());
        let store = Arc::new(MemoryStore::default());

        let batch: Vec<_> = ["a", "b", "c"].into_iter().map(valid).collect();
        let summary = dispatcher(&classifier, &store).dispatch(&batch).await;
        assert!(summary.all_succeeded());

        let ids: Vec<_> = store.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_batch() {
        let classifier = Arc::new(FakeClassifier::default());
        let store = Arc::new(MemoryStore::default());
        let summary = dispatcher(&classifier, &store).dispatch(&[]).await;
        assert_eq!(summary, BatchSummary::default());
    }
}

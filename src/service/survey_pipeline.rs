//! Per-message pipeline: parse, validate, truncate, classify, timestamp,
//! persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::classifier::SentimentClassifier;
use crate::domain::{
    CLASSIFIER_MAX_BYTES, SurveyMessage, SurveyOutcome, SurveyRecord, truncate_to_byte_budget,
};
use crate::error::ProcessingError;
use crate::persistence::SurveyStore;

/// Source of the current instant used for `created_at`.
pub type Clock = fn() -> DateTime<Utc>;

/// Turns one message body into a stored, classified survey.
///
/// Every step either completes or returns a categorized
/// [`ProcessingError`] that aborts only the current message. Holds no
/// per-message state, so one pipeline serves every message of every batch.
#[derive(Debug, Clone)]
pub struct SurveyPipeline {
    classifier: Arc<dyn SentimentClassifier>,
    store: Arc<dyn SurveyStore>,
    language_code: String,
    clock: Clock,
}

impl SurveyPipeline {
    /// Creates a pipeline using the given collaborators.
    #[must_use]
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        store: Arc<dyn SurveyStore>,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            store,
            language_code: language_code.into(),
            clock: Utc::now,
        }
    }

    /// Replaces the clock used for `created_at`.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the language code sent to the classifier.
    #[must_use]
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Processes one message body.
    ///
    /// # Errors
    ///
    /// - [`ProcessingError::MalformedInput`] if the body is not a survey
    ///   record.
    /// - [`ProcessingError::Validation`] if a required field is missing.
    /// - [`ProcessingError::ExternalService`] if the classifier or the store
    ///   fails.
    /// - [`ProcessingError::Unexpected`] for anything else.
    pub async fn process(&self, body: &str) -> Result<SurveyOutcome, ProcessingError> {
        let message = SurveyMessage::parse(body).inspect_err(|e| {
            tracing::error!(survey_id = "unknown", error = %e, "message body is not a survey record");
        })?;
        let survey_id = message.log_id().to_string();

        let survey = message.validate().inspect_err(|e| {
            tracing::warn!(%survey_id, error = %e, "survey failed validation");
        })?;

        let text = survey.trimmed_text();
        let classifier_text = truncate_to_byte_budget(text, CLASSIFIER_MAX_BYTES);
        if classifier_text.len() < text.len() {
            tracing::warn!(
                %survey_id,
                original_bytes = text.len(),
                truncated_bytes = classifier_text.len(),
                "survey text truncated for classification"
            );
        }

        let classification = self
            .classifier
            .classify(classifier_text, &self.language_code)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    %survey_id,
                    error_kind = %e.kind(),
                    error_code = e.provider_code().unwrap_or("Unknown"),
                    error = %e,
                    "sentiment classification failed"
                );
            })?;
        tracing::info!(
            %survey_id,
            sentiment = %classification.sentiment,
            confidence = format_args!("{:.3}", classification.confidence()),
            "survey classified"
        );

        let record = SurveyRecord::compose(survey, &classification, (self.clock)())?;
        self.store.put(&record).await.inspect_err(|e| {
            tracing::error!(
                %survey_id,
                error_kind = %e.kind(),
                error_code = e.provider_code().unwrap_or("Unknown"),
                error = %e,
                "survey store write failed"
            );
        })?;

        tracing::info!(
            %survey_id,
            customer_id = %record.customer_id,
            sentiment = %record.sentiment,
            expires_at = record.expires_at,
            "survey stored"
        );

        Ok(SurveyOutcome {
            survey_id: record.id,
            sentiment: classification.sentiment,
            confidence: classification.confidence(),
        })
    }
}

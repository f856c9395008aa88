//! In-memory collaborators for exercising the pipeline without a network.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::classifier::SentimentClassifier;
use crate::domain::{Classification, Sentiment, SentimentScores, SurveyRecord};
use crate::error::{ExternalService, ProcessingError};
use crate::persistence::SurveyStore;

/// Classifier returning a canned answer and recording its inputs.
#[derive(Debug, Default)]
pub(crate) struct FakeClassifier {
    failure_code: Option<String>,
    pub(crate) calls: Mutex<Vec<(String, String)>>,
}

impl FakeClassifier {
    pub(crate) fn failing(code: &str) -> Self {
        Self {
            failure_code: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(text, _)| text.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SentimentClassifier for FakeClassifier {
    async fn classify(
        &self,
        text: &str,
        language_code: &str,
    ) -> Result<Classification, ProcessingError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((text.to_string(), language_code.to_string()));
        }
        if let Some(code) = &self.failure_code {
            return Err(ProcessingError::external(
                ExternalService::Classifier,
                Some(code.clone()),
                "classifier unavailable",
            ));
        }
        Ok(Classification {
            sentiment: Sentiment::Positive,
            scores: SentimentScores {
                positive: 0.95,
                negative: 0.01,
                neutral: 0.03,
                mixed: 0.01,
            },
        })
    }
}

/// Store keeping records in memory, optionally failing every write.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    failure_code: Option<String>,
    pub(crate) records: Mutex<Vec<SurveyRecord>>,
}

impl MemoryStore {
    pub(crate) fn failing(code: &str) -> Self {
        Self {
            failure_code: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<SurveyRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    async fn put(&self, record: &SurveyRecord) -> Result<(), ProcessingError> {
        if let Some(code) = &self.failure_code {
            return Err(ProcessingError::external(
                ExternalService::Store,
                Some(code.clone()),
                "write rejected",
            ));
        }
        if let Ok(mut records) = self.records.lock() {
            records.retain(|r| r.id != record.id);
            records.push(record.clone());
        }
        Ok(())
    }
}

//! Sentiment classification: the [`SentimentClassifier`] seam and its
//! HTTP implementation.

pub mod http;

use async_trait::async_trait;

pub use http::HttpSentimentClassifier;

use crate::domain::Classification;
use crate::error::ProcessingError;

/// Black-box sentiment classification service.
///
/// Given UTF-8 text and a language code, returns a label with four
/// confidence scores. Callers are responsible for keeping the text within
/// [`crate::domain::CLASSIFIER_MAX_BYTES`].
#[async_trait]
pub trait SentimentClassifier: Send + Sync + std::fmt::Debug {
    /// Classifies `text` written in `language_code`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::ExternalService`] when the service rejects
    /// the call, carrying the provider error code when one is available.
    async fn classify(
        &self,
        text: &str,
        language_code: &str,
    ) -> Result<Classification, ProcessingError>;
}

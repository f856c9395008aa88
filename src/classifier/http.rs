//! HTTP client for a Comprehend-compatible sentiment endpoint.
//!
//! Speaks the JSON `DetectSentiment` protocol: a `POST` carrying
//! `{"Text", "LanguageCode"}` answered by `{"Sentiment", "SentimentScore"}`.
//! Error responses carry the provider error code in `__type` (optionally
//! namespaced with `#`) or `code`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::SentimentClassifier;
use crate::domain::Classification;
use crate::error::{ExternalService, ProcessingError};

/// Operation header value understood by Comprehend-compatible endpoints.
const DETECT_SENTIMENT_TARGET: &str = "Comprehend_20171127.DetectSentiment";

#[derive(Debug, Serialize)]
struct DetectSentimentRequest<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
    #[serde(rename = "LanguageCode")]
    language_code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

impl ProviderErrorBody {
    fn error_code(&self) -> Option<String> {
        self.error_type
            .as_deref()
            .map(|t| t.rsplit('#').next().unwrap_or(t))
            .or(self.code.as_deref())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

/// Sentiment classifier reached over HTTP.
///
/// Holds a shared [`reqwest::Client`]; construct once at startup and reuse
/// for every message. No request timeout is set beyond the client's own
/// defaults.
#[derive(Debug, Clone)]
pub struct HttpSentimentClassifier {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSentimentClassifier {
    /// Creates a classifier posting to `endpoint`.
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentClassifier {
    async fn classify(
        &self,
        text: &str,
        language_code: &str,
    ) -> Result<Classification, ProcessingError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("X-Amz-Target", DETECT_SENTIMENT_TARGET)
            .json(&DetectSentimentRequest {
                text,
                language_code,
            });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            ProcessingError::external(ExternalService::Classifier, None, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let body: ProviderErrorBody = serde_json::from_str(&raw).unwrap_or_default();
            let message = body
                .message
                .clone()
                .unwrap_or_else(|| format!("HTTP {status}: {raw}"));
            return Err(ProcessingError::external(
                ExternalService::Classifier,
                body.error_code(),
                message,
            ));
        }

        response.json::<Classification>().await.map_err(|e| {
            ProcessingError::Unexpected(format!("unreadable classifier response: {e}"))
        })
    }
}

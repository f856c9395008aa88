//! Single-survey processing DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Sentiment, SurveyOutcome};

/// Request body for `POST /api/v1/surveys`.
///
/// The handler feeds the raw body to the pipeline so that decode and
/// validation failures are reported exactly as they are for queued
/// messages; this type documents the expected shape.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SurveyRequest {
    /// Survey identifier.
    pub id: String,
    /// Owning customer identifier.
    #[serde(rename = "customerId")]
    pub customer_id: String,
    /// Free-form survey response.
    #[serde(rename = "surveyText")]
    pub survey_text: String,
}

/// Response body for `POST /api/v1/surveys`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SurveyProcessedResponse {
    /// Survey identifier.
    pub survey_id: String,
    /// Assigned label.
    pub sentiment: Sentiment,
    /// Confidence of the assigned label.
    pub confidence: f64,
    /// Processing timestamp.
    pub processed_at: DateTime<Utc>,
}

impl From<SurveyOutcome> for SurveyProcessedResponse {
    fn from(outcome: SurveyOutcome) -> Self {
        Self {
            survey_id: outcome.survey_id,
            sentiment: outcome.sentiment,
            confidence: outcome.confidence,
            processed_at: Utc::now(),
        }
    }
}

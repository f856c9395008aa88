//! Incoming survey messages and their validated form.

use serde::{Deserialize, Serialize};

use super::Sentiment;
use crate::error::ProcessingError;

/// Survey message as decoded from a queue body, before validation.
///
/// Every field is optional so that a decodable but incomplete message
/// yields a validation error naming the field rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyMessage {
    /// Survey identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Owning customer identifier.
    #[serde(default, rename = "customerId")]
    pub customer_id: Option<String>,
    /// Free-form survey response.
    #[serde(default, rename = "surveyText")]
    pub survey_text: Option<String>,
}

impl SurveyMessage {
    /// Decodes a message body.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::MalformedInput`] if the body is not a JSON
    /// object with string-typed fields.
    pub fn parse(body: &str) -> Result<Self, ProcessingError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Survey id for log lines, `"unknown"` when absent.
    #[must_use]
    pub fn log_id(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or("unknown")
    }

    /// Checks required fields in order: `id`, `customerId`, `surveyText`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::Validation`] naming the first missing,
    /// empty or NUL-bearing field. `surveyText` is checked after trimming
    /// whitespace.
    pub fn validate(self) -> Result<Survey, ProcessingError> {
        let id = self
            .id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ProcessingError::missing_field("id"))
            .and_then(|v| reject_nul(v, "id"))?;
        let customer_id = self
            .customer_id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ProcessingError::missing_field("customerId"))
            .and_then(|v| reject_nul(v, "customerId"))?;
        let survey_text = self
            .survey_text
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ProcessingError::empty_field("surveyText"))
            .and_then(|v| reject_nul(v, "surveyText"))?;

        Ok(Survey {
            id,
            customer_id,
            survey_text,
        })
    }
}

fn reject_nul(value: String, field: &'static str) -> Result<String, ProcessingError> {
    if value.contains('\0') {
        return Err(ProcessingError::nul_in_field(field));
    }
    Ok(value)
}

/// A survey that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survey {
    /// Survey identifier, the stored record's primary key.
    pub id: String,
    /// Owning customer identifier.
    pub customer_id: String,
    /// Survey text exactly as received.
    pub survey_text: String,
}

impl Survey {
    /// Text without surrounding whitespace, the input to classification.
    #[must_use]
    pub fn trimmed_text(&self) -> &str {
        self.survey_text.trim()
    }
}

/// Result of processing one survey successfully.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyOutcome {
    /// Survey identifier.
    pub survey_id: String,
    /// Assigned label.
    pub sentiment: Sentiment,
    /// Confidence of the assigned label.
    pub confidence: f64,
}

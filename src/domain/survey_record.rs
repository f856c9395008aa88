//! The enriched record written to the survey store.

use chrono::{DateTime, Months, Utc};

use super::{Classification, Sentiment, SentimentScores, Survey};
use crate::error::ProcessingError;

/// How long a stored survey lives before the store expires it.
pub const RETENTION_MONTHS: u32 = 12;

/// Survey enriched with its classification and lifetime attributes.
///
/// Created once per valid message and never mutated afterwards. The store
/// reaps it once `expires_at` has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    /// Survey identifier (primary key).
    pub id: String,
    /// Owning customer identifier.
    pub customer_id: String,
    /// Original survey text, never the truncated classifier input.
    pub survey_text: String,
    /// Assigned label.
    pub sentiment: Sentiment,
    /// Confidence per label.
    pub sentiment_score: SentimentScores,
    /// Write time.
    pub created_at: DateTime<Utc>,
    /// Expiry as Unix epoch seconds.
    pub expires_at: i64,
}

impl SurveyRecord {
    /// Composes the record for `survey` written at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::Unexpected`] if `now` plus the retention
    /// period is outside the representable date range.
    pub fn compose(
        survey: Survey,
        classification: &Classification,
        now: DateTime<Utc>,
    ) -> Result<Self, ProcessingError> {
        let expires_at = expiry_after(now)?.timestamp();
        Ok(Self {
            id: survey.id,
            customer_id: survey.customer_id,
            survey_text: survey.survey_text,
            sentiment: classification.sentiment,
            sentiment_score: classification.scores,
            created_at: now,
            expires_at,
        })
    }

    /// `created_at` as an ISO-8601 string.
    #[must_use]
    pub fn created_at_iso(&self) -> String {
        self.created_at.to_rfc3339()
    }
}

/// Advances `created_at` by [`RETENTION_MONTHS`] calendar months.
///
/// When the target month is shorter, the day clamps to its last day
/// (2024-02-29 becomes 2025-02-28). The time of day is kept.
///
/// # Errors
///
/// Returns [`ProcessingError::Unexpected`] on date overflow.
pub fn expiry_after(created_at: DateTime<Utc>) -> Result<DateTime<Utc>, ProcessingError> {
    created_at
        .checked_add_months(Months::new(RETENTION_MONTHS))
        .ok_or_else(|| {
            ProcessingError::Unexpected(format!(
                "cannot compute expiry {RETENTION_MONTHS} months after {created_at}"
            ))
        })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        let Some(dt) = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single() else {
            panic!("valid date");
        };
        dt
    }

    fn expiry(created: DateTime<Utc>) -> DateTime<Utc> {
        let Ok(dt) = expiry_after(created) else {
            panic!("in range");
        };
        dt
    }

    #[test]
    fn month_end_keeps_its_day() {
        assert_eq!(expiry(at(2024, 1, 31, 10)), at(2025, 1, 31, 10));
    }

    #[test]
    fn leap_day_clamps_to_month_end() {
        assert_eq!(expiry(at(2024, 2, 29, 8)), at(2025, 2, 28, 8));
    }

    #[test]
    fn calendar_year_is_not_365_days() {
        // 2024 is a leap year, so a year from March 2023 spans 366 days.
        let created = at(2023, 3, 1, 0);
        let expires = expiry(created);
        assert_eq!(expires, at(2024, 3, 1, 0));
        assert_eq!((expires - created).num_days(), 366);
    }

    #[test]
    fn compose_keeps_original_text() {
        let survey = Survey {
            id: "s1".to_string(),
            customer_id: "c1".to_string(),
            survey_text: "  Great service!  ".to_string(),
        };
        let classification = Classification {
            sentiment: Sentiment::Positive,
            scores: SentimentScores {
                positive: 0.98,
                ..SentimentScores::default()
            },
        };
        let now = at(2024, 1, 31, 10);
        let Ok(record) = SurveyRecord::compose(survey, &classification, now) else {
            panic!("composable");
        };
        assert_eq!(record.id, "s1");
        assert_eq!(record.survey_text, "  Great service!  ");
        assert_eq!(record.sentiment, Sentiment::Positive);
        assert_eq!(record.expires_at, at(2025, 1, 31, 10).timestamp());
        assert_eq!(record.created_at_iso(), "2024-01-31T10:00:00+00:00");
    }
}

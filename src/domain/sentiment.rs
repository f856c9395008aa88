//! Sentiment labels and confidence scores returned by the classifier.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Affect label assigned to a survey text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    /// Predominantly positive.
    Positive,
    /// Predominantly negative.
    Negative,
    /// Neither positive nor negative.
    Neutral,
    /// Both positive and negative.
    Mixed,
}

impl Sentiment {
    /// Returns the label as it is stored and reported.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category confidence scores.
///
/// Serialized with the classifier's PascalCase keys (`Positive`,
/// `Negative`, `Neutral`, `Mixed`). A category missing from a classifier
/// reply scores `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct SentimentScores {
    /// Confidence that the text is positive.
    pub positive: f64,
    /// Confidence that the text is negative.
    pub negative: f64,
    /// Confidence that the text is neutral.
    pub neutral: f64,
    /// Confidence that the text is mixed.
    pub mixed: f64,
}

impl SentimentScores {
    /// Returns the confidence for a single label.
    #[must_use]
    pub const fn for_label(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
            Sentiment::Mixed => self.mixed,
        }
    }

    /// Returns the scores as numeric strings keyed by category, the shape
    /// persisted in the `sentimentScore` attribute.
    #[must_use]
    pub fn to_string_map(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("Positive", self.positive.to_string()),
            ("Negative", self.negative.to_string()),
            ("Neutral", self.neutral.to_string()),
            ("Mixed", self.mixed.to_string()),
        ])
    }
}

/// Classifier output for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Assigned label.
    #[serde(rename = "Sentiment")]
    pub sentiment: Sentiment,
    /// Confidence per label.
    #[serde(rename = "SentimentScore")]
    pub scores: SentimentScores,
}

impl Classification {
    /// Confidence of the assigned label.
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.scores.for_label(self.sentiment)
    }
}

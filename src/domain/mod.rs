//! Domain layer: survey messages, sentiment classification, and the
//! stored record.
//!
//! Everything here is pure: parsing and validating an incoming survey,
//! fitting its text into the classifier's byte budget, and composing the
//! record written to the store. External calls live in
//! [`crate::classifier`] and [`crate::persistence`].

pub mod queue_message;
pub mod sentiment;
pub mod survey;
pub mod survey_record;
pub mod text_budget;

pub use queue_message::{MessageBody, QueueMessage};
pub use sentiment::{Classification, Sentiment, SentimentScores};
pub use survey::{Survey, SurveyMessage, SurveyOutcome};
pub use survey_record::SurveyRecord;
pub use text_budget::{CLASSIFIER_MAX_BYTES, truncate_to_byte_budget};

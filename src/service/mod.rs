//! Service layer: per-message pipeline and batch dispatch.
//!
//! [`SurveyPipeline`] runs the linear parse → validate → truncate →
//! classify → timestamp → persist sequence for one message.
//! [`BatchDispatcher`] drives the pipeline over a queue batch and keeps a
//! single failure from aborting the rest.

pub mod batch_dispatcher;
pub mod survey_pipeline;

#[cfg(test)]
pub(crate) mod fakes;

pub use batch_dispatcher::{BatchDispatcher, BatchSummary};
pub use survey_pipeline::{Clock, SurveyPipeline};

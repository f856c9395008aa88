//! Data Transfer Objects for REST request/response serialization.

pub mod queue_dto;
pub mod survey_dto;

pub use queue_dto::*;
pub use survey_dto::*;

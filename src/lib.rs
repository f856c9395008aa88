//! # survey-sentiment-processor
//!
//! Queue-triggered processor that enriches survey submissions with a
//! sentiment classification and stores them with a time-to-live.
//!
//! Each queued message runs through a linear pipeline: parse, validate,
//! fit the text into the classifier's byte budget, classify, timestamp,
//! and persist. A batch dispatcher runs the pipeline over every message of
//! a batch and contains each failure to its own message.
//!
//! ## Architecture
//!
//! ```text
//! Queue (HTTP push)          Clients (HTTP)
//!     │                          │
//!     ├── POST /events           ├── POST /api/v1/surveys
//!     │                          │
//!     ├── BatchDispatcher (service/)
//!     ├── SurveyPipeline (service/)
//!     │       │
//!     │       ├── SentimentClassifier (classifier/) ── reqwest
//!     │       └── SurveyStore (persistence/) ───────── PostgreSQL
//!     │
//!     └── Domain types (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;

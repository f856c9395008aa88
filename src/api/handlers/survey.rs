//! Single-survey processing endpoint.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{SurveyProcessedResponse, SurveyRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ProcessingError};

/// `POST /surveys` — Classify and store one survey synchronously.
///
/// # Errors
///
/// Returns [`ProcessingError`] when the body is malformed, a required field
/// is missing, or the classifier or store fails.
#[utoipa::path(
    post,
    path = "/api/v1/surveys",
    tag = "Surveys",
    summary = "Process one survey",
    description = "Runs the survey pipeline on a single message outside the queue and returns the assigned sentiment.",
    request_body = SurveyRequest,
    responses(
        (status = 200, description = "Survey classified and stored", body = SurveyProcessedResponse),
        (status = 400, description = "Malformed body or missing field", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
        (status = 502, description = "Classifier or store failure", body = ErrorResponse),
    )
)]
pub async fn process_survey(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<SurveyProcessedResponse>, ProcessingError> {
    let outcome = state.dispatcher.pipeline().process(&body).await?;
    Ok(Json(SurveyProcessedResponse::from(outcome)))
}

/// Survey routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/surveys", post(process_survey))
}

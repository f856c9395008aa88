//! Queue push endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{BatchResponse, QueueEvent};
use crate::app_state::AppState;

/// `POST /events` — Process one queue batch.
///
/// Always answers `200 OK` for a JSON object body: per-message failures are
/// reported through the counts and `batchItemFailures`, never as an overall
/// failure.
#[utoipa::path(
    post,
    path = "/events",
    tag = "Queue",
    summary = "Process a queue batch",
    description = "Classifies and stores every survey message in the batch. Failed messages are counted; those that failed transiently are listed in `batchItemFailures` for redelivery. A bad record fails only itself and the batch never fails.",
    request_body = QueueEvent,
    responses(
        (status = 200, description = "Batch processed", body = BatchResponse),
    )
)]
pub async fn receive_batch(
    State(state): State<AppState>,
    Json(event): Json<QueueEvent>,
) -> impl IntoResponse {
    let messages = event.into_messages();
    let summary = state.dispatcher.dispatch(&messages).await;
    (StatusCode::OK, Json(BatchResponse::from(summary)))
}

/// Queue routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", post(receive_batch))
}

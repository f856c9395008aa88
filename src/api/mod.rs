//! REST API layer: route handlers, DTOs, and router composition.
//!
//! The queue push endpoint and health check live at the root; the
//! single-survey endpoint is mounted under `/api/v1`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        handlers::queue::receive_batch,
        handlers::survey::process_survey,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::QueueEvent,
        dto::QueueRecord,
        dto::BatchResponse,
        dto::BatchItemFailure,
        dto::SurveyRequest,
        dto::SurveyProcessedResponse,
        handlers::system::HealthResponse,
        crate::domain::Sentiment,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Queue", description = "Queue batch ingestion"),
        (name = "Surveys", description = "Direct survey processing"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::queue::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

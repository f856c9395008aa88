//! survey-sentiment-processor entry point.
//!
//! Loads configuration, builds the classifier and store clients once, and
//! serves the queue push endpoint.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use survey_sentiment_processor::api;
use survey_sentiment_processor::app_state::AppState;
use survey_sentiment_processor::classifier::{HttpSentimentClassifier, SentimentClassifier};
use survey_sentiment_processor::config::ProcessorConfig;
use survey_sentiment_processor::persistence::{PostgresSurveyStore, SurveyStore};
use survey_sentiment_processor::service::{BatchDispatcher, SurveyPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (and `.env`) before tracing reads RUST_LOG and
    // LOG_FORMAT; a missing TABLE_NAME stops startup here
    let config = ProcessorConfig::from_env().context("invalid configuration")?;
    init_tracing();

    tracing::info!(
        addr = %config.listen_addr,
        table = %config.table_name,
        region = %config.region,
        "starting survey-sentiment-processor"
    );

    // Build storage client
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("cannot connect to database")?;
    let store = PostgresSurveyStore::new(pool, config.table_name.clone());
    store
        .ensure_table()
        .await
        .context("cannot prepare survey table")?;

    // Build classifier client
    let classifier = HttpSentimentClassifier::new(
        reqwest::Client::new(),
        config.classifier_endpoint.clone(),
        config.classifier_api_key.clone(),
    );
    tracing::info!(endpoint = classifier.endpoint(), "sentiment classifier configured");

    // Build service layer
    let classifier: Arc<dyn SentimentClassifier> = Arc::new(classifier);
    let store: Arc<dyn SurveyStore> = Arc::new(store);
    let pipeline = SurveyPipeline::new(classifier, store, config.language_code.clone());
    let app_state = AppState::new(BatchDispatcher::new(pipeline));

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` sets the filter (default
/// `info`); `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use tryon_studio::app_state::AppState;
use tryon_studio::config::AppConfig;
use tryon_studio::routes;
use tryon_studio::services::storage::{BlobStore, S3BlobStore};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing tryon-studio server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    metrics::describe_counter!("predictions_submitted_total", "Predictions accepted by the provider");
    metrics::describe_counter!("predictions_succeeded_total", "Predictions that reached succeeded");
    metrics::describe_counter!("predictions_failed_total", "Predictions the provider reported as failed");
    metrics::describe_counter!(
        "predictions_timed_out_total",
        "Predictions still pending when the polling budget ran out"
    );
    metrics::describe_counter!(
        "auth_scheme_rejections_total",
        "Creation attempts rejected with 401, by operation and auth scheme"
    );
    metrics::describe_histogram!(
        "prediction_duration_seconds",
        "Time from prediction submission to terminal status or timeout"
    );

    if config.provider_api_key.is_empty() {
        tracing::warn!("PROVIDER_API_KEY is not set; generation endpoints will return 401");
    }

    // Initialize blob storage client
    let storage: Option<Arc<dyn BlobStore>> = match config.blob_settings() {
        Some(settings) => {
            tracing::info!(bucket = %settings.bucket, "Initializing blob storage client");
            let store = S3BlobStore::new(&settings).expect("Failed to initialize blob storage");
            Some(Arc::new(store))
        }
        None => {
            tracing::warn!("Blob storage is not configured; try-on uploads will fail");
            None
        }
    };

    let state = AppState::new(&config, storage).expect("Invalid provider configuration");

    let app = routes::router(state).route(
        "/metrics",
        get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
    );

    tracing::info!("Starting tryon-studio on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::services::storage::BlobStore;

pub mod error;
pub mod generate_model;
pub mod health;
pub mod metrics;
pub mod proxy_image;
pub mod removebg;
pub mod tryon;
pub mod video;

use error::ApiError;

/// Build the API router with its middleware stack.
pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/generate-model", post(generate_model::generate_model))
        .route("/tryon", post(tryon::tryon))
        .route("/video", post(video::generate_video))
        .route("/removebg", post(removebg::remove_background))
        .route("/proxy-image", get(proxy_image::proxy_image))
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
}

/// Fail with 401 when no provider key is configured.
fn require_provider(state: &AppState) -> Result<(), ApiError> {
    if state.provider.is_configured() {
        Ok(())
    } else {
        Err(ApiError::MissingCredentials("PROVIDER_API_KEY missing".to_string()))
    }
}

fn require_storage(state: &AppState) -> Result<Arc<dyn BlobStore>, ApiError> {
    state
        .storage
        .clone()
        .ok_or_else(|| ApiError::Internal("Blob storage not configured".to_string()))
}

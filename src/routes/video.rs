use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::app_state::AppState;
use crate::models::video::{VideoRequest, VideoResponse};
use crate::routes::error::ApiError;
use crate::routes::{require_provider, require_storage};
use crate::services::data_uri;
use crate::services::normalizer;
use crate::services::prediction::{run_prediction, Operation};
use crate::services::provider::CreatePrediction;

/// POST /video — animate a still image into a short clip.
pub async fn generate_video(
    State(state): State<AppState>,
    body: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<VideoResponse>, ApiError> {
    require_provider(&state)?;

    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if request.prompt.trim().is_empty() || request.image_url.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing prompt or imageUrl".to_string()));
    }

    let image_url = public_image_url(&state, &request.image_url).await?;

    let mut input = json!({
        "prompt": request.prompt,
        "image_url": image_url,
        "duration": request.duration(),
        "resolution": request.resolution(),
        "prompt_optimizer": request.prompt_optimizer.unwrap_or(true),
    });
    if let Some(end_image_url) = request.end_image_url.as_deref().filter(|u| !u.is_empty()) {
        input["end_image_url"] = json!(public_image_url(&state, end_image_url).await?);
    }

    tracing::info!(duration = request.duration(), resolution = request.resolution(), "Generating video");

    let payload = CreatePrediction::new(&state.models.video, &state.models.version, input);
    let prediction =
        run_prediction(&state.provider, Operation::Video, &payload, state.video_poll).await?;
    let job = prediction.job;

    let Some(video) = normalizer::extract_video(&job.payload) else {
        tracing::error!(prediction_id = %job.id, raw = %job.payload, "No video URL in prediction result");
        return Err(ApiError::NoOutput {
            message: "No video URL found".to_string(),
            raw: job.payload,
        });
    };

    Ok(Json(VideoResponse {
        video_url: video.url,
        content_type: video.content_type,
        description: video.description,
    }))
}

/// Providers need fetchable URLs, so inline `data:` images go to blob storage first.
async fn public_image_url(state: &AppState, image: &str) -> Result<String, ApiError> {
    if !data_uri::is_data_uri(image) {
        return Ok(image.to_string());
    }

    let decoded = data_uri::parse_data_uri(image)
        .map_err(|e| ApiError::BadRequest(format!("Invalid imageUrl: {e}")))?;
    let storage = require_storage(state)?;
    let filename = format!("frame.{}", decoded.extension());

    Ok(storage.upload(&decoded.bytes, &filename, &decoded.mime).await?)
}

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use garde::Validate;
use serde_json::json;

use crate::app_state::AppState;
use crate::models::generation::{GenerateModelRequest, GenerateModelResponse};
use crate::routes::error::ApiError;
use crate::routes::require_provider;
use crate::services::prediction::{run_prediction, Operation};
use crate::services::prompt;
use crate::services::provider::CreatePrediction;

/// POST /generate-model — text-to-image generation of a fashion model photo.
pub async fn generate_model(
    State(state): State<AppState>,
    body: Result<Json<GenerateModelRequest>, JsonRejection>,
) -> Result<Json<GenerateModelResponse>, ApiError> {
    require_provider(&state)?;

    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    request
        .validate()
        .map_err(|_| ApiError::BadRequest("Missing ethnicity or gender".to_string()))?;

    let style = request.style();
    let prompt = prompt::build_generation_prompt(&request.gender, &request.ethnicity, style);

    tracing::info!(style = style.as_ref(), aspect_ratio = request.aspect_ratio(), "Generating model photo");

    let payload = CreatePrediction::new(
        &state.models.generation,
        &state.models.version,
        json!({
            "prompt": prompt,
            "num_images": 1,
            "output_format": "png",
            "sync_mode": false,
            "aspect_ratio": request.aspect_ratio(),
            "limit_generations": true,
        }),
    );

    let prediction = run_prediction(&state.provider, Operation::GenerateModel, &payload, state.poll).await?;
    let job = prediction.job;

    let Some(image_url) = job.outputs.first().cloned() else {
        tracing::error!(prediction_id = %job.id, raw = %job.payload, "No image URL in prediction result");
        return Err(ApiError::NoOutput {
            message: "No image URL found".to_string(),
            raw: job.payload,
        });
    };

    Ok(Json(GenerateModelResponse {
        image_url,
        id: job.id,
    }))
}

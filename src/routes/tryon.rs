use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::json;

use crate::app_state::AppState;
use crate::models::tryon::{PromptControls, TryOnResponse};
use crate::routes::error::ApiError;
use crate::routes::{require_provider, require_storage};
use crate::services::prediction::{run_prediction, Operation};
use crate::services::prompt;
use crate::services::provider::CreatePrediction;

/// An uploaded image part.
struct ImagePart {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// POST /tryon — dress a human photo in a garment photo.
///
/// Multipart fields: `human_image`, `garment_image` (files), and optionally
/// `meta_prompt`, `scene_style`, `fit_strength`, `keep_body`.
pub async fn tryon(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TryOnResponse>, ApiError> {
    let mut human: Option<ImagePart> = None;
    let mut garment: Option<ImagePart> = None;
    let mut meta_prompt: Option<String> = None;
    let mut controls = PromptControls::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "human_image" | "garment_image" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{name}.png"));
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                if data.is_empty() {
                    continue;
                }

                // Validate image format using the `image` crate
                let format = image::guess_format(&data).map_err(|_| {
                    ApiError::BadRequest(format!("Unsupported image format for {name}"))
                })?;

                let part = ImagePart {
                    filename,
                    content_type: format.to_mime_type().to_string(),
                    data: data.to_vec(),
                };
                if name == "human_image" {
                    human = Some(part);
                } else {
                    garment = Some(part);
                }
            }
            "meta_prompt" => meta_prompt = Some(text(field).await?),
            "scene_style" => controls.scene_style = Some(text(field).await?),
            "fit_strength" => {
                let value = text(field).await?;
                let fit = value
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|fit| *fit <= 100)
                    .ok_or_else(|| {
                        ApiError::BadRequest(
                            "fit_strength must be an integer from 0 to 100".to_string(),
                        )
                    })?;
                controls.fit_strength = Some(fit);
            }
            "keep_body" => {
                let value = text(field).await?;
                controls.keep_body = Some(matches!(value.trim(), "true" | "1" | "on" | "yes"));
            }
            _ => {}
        }
    }

    let (Some(human), Some(garment)) = (human, garment) else {
        return Err(ApiError::BadRequest("Missing files".to_string()));
    };

    require_provider(&state)?;
    let storage = require_storage(&state)?;

    let (human_url, garment_url) = tokio::try_join!(
        storage.upload(&human.data, &human.filename, &human.content_type),
        storage.upload(&garment.data, &garment.filename, &garment.content_type),
    )?;

    tracing::info!(human_url = %human_url, garment_url = %garment_url, "Uploaded try-on images");

    let prompt = prompt::resolve_tryon_prompt(meta_prompt.as_deref(), &controls);

    let payload = CreatePrediction::new(
        &state.models.tryon,
        &state.models.version,
        json!({
            "image_urls": [human_url, garment_url],
            "num_images": 1,
            "prompt": prompt,
            "output_format": "jpeg",
            "sync_mode": false,
            "aspect_ratio": "1:1",
            "limit_generations": true,
        }),
    );

    let prediction = run_prediction(&state.provider, Operation::TryOn, &payload, state.poll).await?;
    let job = prediction.job;

    let Some(image_url) = job.outputs.first().cloned() else {
        tracing::error!(prediction_id = %job.id, raw = %job.payload, "No image URL in try-on result");
        return Err(ApiError::NoOutput {
            message: "No image URL found".to_string(),
            raw: job.payload,
        });
    };

    Ok(Json(TryOnResponse {
        image_url,
        urls: job.outputs,
        id: job.id,
        auth_variant: prediction.scheme.to_string(),
    }))
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

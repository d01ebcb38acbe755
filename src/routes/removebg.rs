use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::routes::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RemoveBgRequest {
    /// Public URL or `data:` URI.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RemoveBgResponse {
    pub image_url: String,
    pub description: &'static str,
}

/// POST /removebg — passthrough; the image comes back unchanged.
pub async fn remove_background(
    body: Result<Json<RemoveBgRequest>, JsonRejection>,
) -> Result<Json<RemoveBgResponse>, ApiError> {
    let invalid = || ApiError::BadRequest("Missing or invalid `image`".to_string());

    let Json(request) = body.map_err(|_| invalid())?;
    let image = request.image.filter(|i| !i.is_empty()).ok_or_else(invalid)?;

    Ok(Json(RemoveBgResponse {
        image_url: image,
        description: "Passthrough mode: background removal is not enabled for the current provider.",
    }))
}

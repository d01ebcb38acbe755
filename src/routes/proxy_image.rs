use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::routes::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub u: Option<String>,
}

/// GET /proxy-image?u=<url> — re-serve a remote image with permissive CORS
/// so browsers can read its pixels from a canvas.
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Result<Response, ApiError> {
    let url = params
        .u
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing ?u=".to_string()))?;

    let upstream = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Internal(format!("proxy error: {e}")))?;

    if !upstream.status().is_success() {
        tracing::warn!(url = %url, status = upstream.status().as_u16(), "Upstream image fetch failed");
        return Err(ApiError::BadGateway("Upstream fetch failed".to_string()));
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("image/png"));

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=60")),
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
    ];

    Ok((StatusCode::OK, headers, Body::from_stream(upstream.bytes_stream())).into_response())
}

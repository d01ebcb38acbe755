use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use std::any::Any;

use crate::services::poller::PollError;
use crate::services::prediction::PredictionError;
use crate::services::provider::ProviderError;
use crate::services::storage::StorageError;

/// Error returned by route handlers, rendered as `{"error": ...}` JSON.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingCredentials(String),

    #[error("{0}")]
    BadRequest(String),

    /// The provider refused to create or report on a prediction.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        detail: Value,
        auth_variant: Option<String>,
    },

    #[error("Prediction failed")]
    PredictionFailed { detail: Value },

    #[error("Prediction timeout or no result")]
    Timeout,

    #[error("{message}")]
    NoOutput { message: String, raw: Value },

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => *status,
            ApiError::PredictionFailed { .. } | ApiError::NoOutput { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = Map::new();
        body.insert("error".to_string(), json!(self.to_string()));

        match self {
            ApiError::Upstream {
                detail,
                auth_variant,
                ..
            } => {
                body.insert("detail".to_string(), detail);
                if let Some(variant) = auth_variant {
                    body.insert("authVariant".to_string(), json!(variant));
                }
            }
            ApiError::PredictionFailed { detail } => {
                body.insert("detail".to_string(), detail);
            }
            ApiError::NoOutput { raw, .. } => {
                body.insert("raw".to_string(), raw);
            }
            _ => {}
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::Submit(err) => err.into(),
            PredictionError::Poll(PollError::Unauthorized { body }) => ApiError::Upstream {
                status: StatusCode::UNAUTHORIZED,
                message: "Unauthorized (provider poll)".to_string(),
                detail: body,
                auth_variant: None,
            },
            PredictionError::Poll(PollError::Provider(err)) => err.into(),
            PredictionError::Failed(job) => ApiError::PredictionFailed {
                detail: job.payload,
            },
            PredictionError::TimedOut { .. } => ApiError::Timeout,
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        let message = "Prediction create failed".to_string();
        match err {
            ProviderError::Rejected {
                status,
                body,
                scheme,
            } => ApiError::Upstream {
                status,
                message,
                detail: body,
                auth_variant: Some(scheme.to_string()),
            },
            ProviderError::MissingJobId { body, scheme } => ApiError::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message,
                detail: body,
                auth_variant: Some(scheme.to_string()),
            },
            ProviderError::AllUnauthorized => ApiError::Upstream {
                status: StatusCode::UNAUTHORIZED,
                message,
                detail: json!({"error": "All auth variants 401"}),
                auth_variant: Some("all-401".to_string()),
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(format!("Blob upload failed: {err}"))
    }
}

/// Convert a handler panic into the generic 500 body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Server error".to_string()
    };
    tracing::error!(error = %message, "Handler panicked");
    ApiError::Internal(message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::provider::AuthScheme;

    #[test]
    fn test_rejected_create_keeps_upstream_status() {
        let err: ApiError = ProviderError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: json!({"message": "bad input"}),
            scheme: AuthScheme::ApiKey,
        }
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(matches!(
            err,
            ApiError::Upstream { auth_variant: Some(ref v), .. } if v == "api-key"
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(ProviderError::AllUnauthorized).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(PredictionError::TimedOut {
                job_id: "j".to_string(),
                attempts: 20
            })
            .status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::MissingCredentials("PROVIDER_API_KEY missing".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    async fn panic_body(payload: Box<dyn Any + Send + 'static>) -> (StatusCode, Value) {
        let response = panic_response(payload);
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_panic_payloads_become_500_body() {
        let (status, body) = panic_body(Box::new(String::from("index out of bounds"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "index out of bounds"}));

        let (status, body) = panic_body(Box::new("static message")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "static message"}));

        let (_, body) = panic_body(Box::new(42_u32)).await;
        assert_eq!(body["error"], "Server error");
    }
}

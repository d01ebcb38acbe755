//! Client for prediction-style image/video providers.
//!
//! The provider's authentication header convention is not reliably
//! documented, so creation requests are signed with each configured
//! [`AuthScheme`] in turn until one is not rejected with 401.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::services::prediction::Operation;

/// Authentication header convention sent in `Authorization`.
///
/// Every scheme also sends the key as `X-API-Key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `Authorization: Api-Key <key>`
    ApiKey,
    /// `Authorization: <key>`
    Raw,
}

impl AuthScheme {
    pub fn headers(self, api_key: &str) -> Result<HeaderMap, ProviderError> {
        let authorization = match self {
            AuthScheme::Bearer => format!("Bearer {api_key}"),
            AuthScheme::ApiKey => format!("Api-Key {api_key}"),
            AuthScheme::Raw => api_key.to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization).map_err(|_| ProviderError::InvalidKey)?,
        );
        headers.insert(
            "X-API-Key",
            HeaderValue::from_str(api_key).map_err(|_| ProviderError::InvalidKey)?,
        );
        Ok(headers)
    }
}

/// Body of a prediction creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePrediction {
    pub model: String,
    pub version: String,
    pub input: Value,
    /// Always empty: results are collected by polling.
    pub webhook_url: String,
}

impl CreatePrediction {
    pub fn new(model: impl Into<String>, version: impl Into<String>, input: Value) -> Self {
        Self {
            model: model.into(),
            version: version.into(),
            input,
            webhook_url: String::new(),
        }
    }
}

/// A prediction the provider accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub job_id: String,
    /// Scheme the provider accepted; status queries must reuse it.
    pub scheme: AuthScheme,
}

/// Raw status response for a job.
#[derive(Debug, Clone)]
pub struct StatusResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct ProviderClient {
    http: Client,
    endpoint: String,
    api_key: String,
    schemes: Vec<AuthScheme>,
}

impl ProviderClient {
    pub fn new(
        http: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        schemes: Vec<AuthScheme>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            schemes,
        }
    }

    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), job_id)
    }

    /// Create a prediction, probing authentication schemes in order.
    ///
    /// A 401 moves on to the next scheme. Any other failure is returned
    /// immediately without trying further schemes.
    pub async fn submit(
        &self,
        operation: Operation,
        payload: &CreatePrediction,
    ) -> Result<Submission, ProviderError> {
        for &scheme in &self.schemes {
            let response = self
                .http
                .post(&self.endpoint)
                .headers(scheme.headers(&self.api_key)?)
                .json(payload)
                .send()
                .await?;

            let status = response.status();
            let body = safe_json(response).await;

            if status == StatusCode::UNAUTHORIZED {
                tracing::warn!(scheme = %scheme, model = %payload.model, "Provider rejected auth scheme");
                metrics::counter!(
                    "auth_scheme_rejections_total",
                    "operation" => operation.as_ref().to_string(),
                    "scheme" => scheme.to_string()
                )
                .increment(1);
                continue;
            }

            if !status.is_success() {
                tracing::error!(
                    scheme = %scheme,
                    status = status.as_u16(),
                    body = %body,
                    "Prediction create failed"
                );
                return Err(ProviderError::Rejected { status, body, scheme });
            }

            return match job_id(&body) {
                Some(job_id) => {
                    tracing::info!(prediction_id = %job_id, scheme = %scheme, model = %payload.model, "Prediction created");
                    Ok(Submission { job_id, scheme })
                }
                None => Err(ProviderError::MissingJobId { body, scheme }),
            };
        }

        Err(ProviderError::AllUnauthorized)
    }

    /// Query a job's status with the scheme accepted at creation.
    pub async fn fetch_status(
        &self,
        job_id: &str,
        scheme: AuthScheme,
    ) -> Result<StatusResponse, ProviderError> {
        let response = self
            .http
            .get(self.job_url(job_id))
            .headers(scheme.headers(&self.api_key)?)
            .send()
            .await?;

        let status = response.status();
        Ok(StatusResponse {
            status,
            body: safe_json(response).await,
        })
    }
}

/// Job ids are strings, but tolerate numeric ids.
fn job_id(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a JSON body, yielding `Null` for empty or non-JSON bodies.
async fn safe_json(response: Response) -> Value {
    response.json().await.unwrap_or(Value::Null)
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request to provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider API key contains characters not allowed in a header")]
    InvalidKey,

    #[error("Prediction create failed with status {status}")]
    Rejected {
        status: StatusCode,
        body: Value,
        scheme: AuthScheme,
    },

    #[error("Prediction create response has no job id")]
    MissingJobId { body: Value, scheme: AuthScheme },

    #[error("All auth variants 401")]
    AllUnauthorized,
}

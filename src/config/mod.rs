use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::services::provider::AuthScheme;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Prediction provider API key. Empty means "not configured".
    #[serde(default)]
    pub provider_api_key: String,

    /// Prediction endpoint; job ids are appended for status queries.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Comma-separated authentication schemes, tried in order.
    #[serde(default = "default_auth_schemes")]
    pub provider_auth_schemes: String,

    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Image-to-video jobs run much longer than image jobs.
    #[serde(default = "default_video_poll_max_attempts")]
    pub video_poll_max_attempts: u32,

    #[serde(default = "default_generation_model")]
    pub model_generation_model: String,

    #[serde(default = "default_tryon_model")]
    pub tryon_model: String,

    #[serde(default = "default_video_model")]
    pub video_model: String,

    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Blob storage bucket name (S3-compatible)
    pub blob_bucket: Option<String>,

    /// Blob storage endpoint URL
    pub blob_endpoint: Option<String>,

    /// Blob storage access key ID
    pub blob_access_key: Option<String>,

    /// Blob storage secret access key
    pub blob_secret_key: Option<String>,

    /// Public base URL objects are served from; must be fetchable by the provider.
    pub blob_public_url: Option<String>,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Connection settings for S3-compatible blob storage.
#[derive(Debug, Clone)]
pub struct BlobSettings {
    pub bucket: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub public_url: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_provider_url() -> String {
    "https://api.eachlabs.ai/v1/prediction/".to_string()
}

fn default_auth_schemes() -> String {
    "bearer,api-key,raw".to_string()
}

fn default_poll_max_attempts() -> u32 {
    20
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_video_poll_max_attempts() -> u32 {
    100
}

fn default_generation_model() -> String {
    "nano-banana".to_string()
}

fn default_tryon_model() -> String {
    "nano-banana-edit".to_string()
}

fn default_video_model() -> String {
    "minimax-hailuo-02-standard-image-to-video".to_string()
}

fn default_model_version() -> String {
    "0.0.1".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Parse the configured authentication scheme list, preserving order.
    pub fn auth_schemes(&self) -> Result<Vec<AuthScheme>, ConfigError> {
        let schemes = self
            .provider_auth_schemes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| AuthScheme::from_str(s).map_err(|_| ConfigError::UnknownScheme(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        if schemes.is_empty() {
            return Err(ConfigError::NoSchemes);
        }
        Ok(schemes)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Blob storage settings, if every required variable is present.
    pub fn blob_settings(&self) -> Option<BlobSettings> {
        Some(BlobSettings {
            bucket: self.blob_bucket.clone()?,
            endpoint: self.blob_endpoint.clone()?,
            access_key: self.blob_access_key.clone()?,
            secret_key: self.blob_secret_key.clone()?,
            public_url: self.blob_public_url.clone()?,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown provider auth scheme: {0}")]
    UnknownScheme(String),

    #[error("PROVIDER_AUTH_SCHEMES must name at least one scheme")]
    NoSchemes,
}

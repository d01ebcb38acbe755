use std::sync::Arc;

use crate::config::{AppConfig, ConfigError};
use crate::services::poller::PollSettings;
use crate::services::provider::ProviderClient;
use crate::services::storage::BlobStore;

/// Model identifiers sent with each prediction.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub generation: String,
    pub tryon: String,
    pub video: String,
    pub version: String,
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<ProviderClient>,
    pub storage: Option<Arc<dyn BlobStore>>,
    /// Plain client for fetching remote images in the proxy route.
    pub http: reqwest::Client,
    pub models: Arc<ModelSettings>,
    pub poll: PollSettings,
    pub video_poll: PollSettings,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        storage: Option<Arc<dyn BlobStore>>,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::new();
        let provider = ProviderClient::new(
            http.clone(),
            config.provider_url.clone(),
            config.provider_api_key.clone(),
            config.auth_schemes()?,
        );

        Ok(Self {
            provider: Arc::new(provider),
            storage,
            http,
            models: Arc::new(ModelSettings {
                generation: config.model_generation_model.clone(),
                tryon: config.tryon_model.clone(),
                video: config.video_model.clone(),
                version: config.model_version.clone(),
            }),
            poll: PollSettings {
                max_attempts: config.poll_max_attempts,
                interval: config.poll_interval(),
            },
            video_poll: PollSettings {
                max_attempts: config.video_poll_max_attempts,
                interval: config.poll_interval(),
            },
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

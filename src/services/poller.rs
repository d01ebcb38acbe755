//! Fixed-interval status polling for submitted predictions.

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::models::job::{Job, JobStatus};
use crate::services::provider::{AuthScheme, ProviderClient, ProviderError};

/// Attempt budget and delay between status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_millis(3000),
        }
    }
}

/// How polling ended.
///
/// Timing out is not a job state: the job may still finish on the provider.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Succeeded(Job),
    Failed(Job),
    TimedOut { job_id: String, attempts: u32 },
}

/// Poll a job until it reaches a terminal status or the budget runs out.
///
/// Sleeps `interval` before every attempt. A 401 stops polling immediately.
/// Non-terminal or unrecognized statuses, including non-2xx responses other
/// than 401, consume an attempt and continue.
pub async fn poll(
    client: &ProviderClient,
    job_id: &str,
    scheme: AuthScheme,
    settings: PollSettings,
) -> Result<PollOutcome, PollError> {
    let mut job = Job::new(job_id);

    for attempt in 1..=settings.max_attempts {
        sleep(settings.interval).await;

        let response = client.fetch_status(job_id, scheme).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            tracing::error!(prediction_id = %job_id, scheme = %scheme, attempt, "Provider rejected status query");
            return Err(PollError::Unauthorized { body: response.body });
        }
        if !response.status.is_success() {
            tracing::warn!(
                prediction_id = %job_id,
                attempt,
                status = response.status.as_u16(),
                "Status query returned an error"
            );
        }

        match job.observe(response.body) {
            JobStatus::Succeeded => {
                tracing::info!(prediction_id = %job_id, attempt, outputs = job.outputs.len(), "Prediction succeeded");
                return Ok(PollOutcome::Succeeded(job));
            }
            JobStatus::Failed => {
                tracing::warn!(prediction_id = %job_id, attempt, "Prediction failed");
                return Ok(PollOutcome::Failed(job));
            }
            JobStatus::Pending => {
                tracing::debug!(prediction_id = %job_id, attempt, "Prediction still pending");
            }
        }
    }

    tracing::warn!(prediction_id = %job_id, attempts = settings.max_attempts, "Prediction polling budget exhausted");
    Ok(PollOutcome::TimedOut {
        job_id: job_id.to_string(),
        attempts: settings.max_attempts,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Unauthorized (provider poll)")]
    Unauthorized { body: Value },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

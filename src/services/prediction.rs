//! Submit-then-poll orchestration shared by every generation endpoint.

use std::time::Instant;
use strum::AsRefStr;

use crate::models::job::Job;
use crate::services::poller::{self, PollError, PollOutcome, PollSettings};
use crate::services::provider::{AuthScheme, CreatePrediction, ProviderClient, ProviderError};

/// Which endpoint a prediction belongs to, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Operation {
    #[strum(serialize = "generate_model")]
    GenerateModel,
    #[strum(serialize = "tryon")]
    TryOn,
    #[strum(serialize = "video")]
    Video,
}

/// A prediction that finished successfully.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub job: Job,
    pub scheme: AuthScheme,
}

/// Create a prediction and wait for its terminal status.
pub async fn run_prediction(
    client: &ProviderClient,
    operation: Operation,
    payload: &CreatePrediction,
    settings: PollSettings,
) -> Result<Prediction, PredictionError> {
    let op = operation.as_ref().to_string();
    let start = Instant::now();

    let submission = client.submit(operation, payload).await?;
    metrics::counter!("predictions_submitted_total", "operation" => op.clone()).increment(1);

    let outcome = poller::poll(client, &submission.job_id, submission.scheme, settings).await;
    metrics::histogram!("prediction_duration_seconds", "operation" => op.clone())
        .record(start.elapsed().as_secs_f64());

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            metrics::counter!("predictions_failed_total", "operation" => op).increment(1);
            return Err(err.into());
        }
    };

    match outcome {
        PollOutcome::Succeeded(job) => {
            metrics::counter!("predictions_succeeded_total", "operation" => op).increment(1);
            Ok(Prediction {
                job,
                scheme: submission.scheme,
            })
        }
        PollOutcome::Failed(job) => {
            metrics::counter!("predictions_failed_total", "operation" => op).increment(1);
            Err(PredictionError::Failed(job))
        }
        PollOutcome::TimedOut { job_id, attempts } => {
            metrics::counter!("predictions_timed_out_total", "operation" => op).increment(1);
            Err(PredictionError::TimedOut { job_id, attempts })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Submit(#[from] ProviderError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Prediction failed")]
    Failed(Job),

    #[error("Prediction timeout or no result")]
    TimedOut { job_id: String, attempts: u32 },
}

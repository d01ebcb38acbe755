use serde_json::Value;

use crate::services::normalizer;

/// Status of a prediction as reported by the provider.
///
/// Anything other than `succeeded` or `failed` ("starting", "processing",
/// unrecognized strings) is treated as still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn from_provider(status: Option<&str>) -> Self {
        match status {
            Some("succeeded") => JobStatus::Succeeded,
            Some("failed") => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

/// A prediction submitted to the provider.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Result URLs or data URIs. Empty until the job has succeeded.
    pub outputs: Vec<String>,
    /// Last payload observed from the provider.
    pub payload: Value,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            outputs: Vec::new(),
            payload: Value::Null,
        }
    }

    /// Apply a status response. Once terminal, further observations are ignored.
    pub fn observe(&mut self, payload: Value) -> JobStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        self.status = JobStatus::from_provider(payload.get("status").and_then(Value::as_str));
        if self.status == JobStatus::Succeeded {
            self.outputs = normalizer::extract_outputs(&payload);
        }
        self.payload = payload;
        self.status
    }
}

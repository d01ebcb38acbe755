//! Test helper utilities: mock provider wiring, in-memory blob storage,
//! and request builders for driving the router without a socket.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use wiremock::MockServer;

use tryon_studio::app_state::AppState;
use tryon_studio::config::AppConfig;
use tryon_studio::services::storage::{BlobStore, StorageError};

use crate::fixtures::PREDICTION_PATH;

pub const API_KEY: &str = "test-key";

/// A recorded upload.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

/// Blob storage double that keeps uploads in memory.
#[derive(Default)]
pub struct MemoryBlobStore {
    pub objects: Mutex<Vec<StoredObject>>,
}

impl MemoryBlobStore {
    pub fn uploads(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.objects.lock().unwrap().push(StoredObject {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
        });
        Ok(format!("https://blob.test/uploads/{filename}"))
    }
}

/// Configuration pointing at the mock provider with a 1 ms poll interval.
pub fn test_config(server: &MockServer, overrides: &[(&str, &str)]) -> AppConfig {
    let mut vars = vec![
        ("PROVIDER_API_KEY".to_string(), API_KEY.to_string()),
        ("PROVIDER_URL".to_string(), format!("{}{}", server.uri(), PREDICTION_PATH)),
        ("POLL_INTERVAL_MS".to_string(), "1".to_string()),
        ("POLL_MAX_ATTEMPTS".to_string(), "5".to_string()),
        ("VIDEO_POLL_MAX_ATTEMPTS".to_string(), "5".to_string()),
    ];
    for (key, value) in overrides {
        vars.retain(|(k, _)| k != key);
        vars.push((key.to_string(), value.to_string()));
    }
    envy::from_iter(vars).expect("test config")
}

pub struct TestApp {
    pub router: Router,
    pub storage: Arc<MemoryBlobStore>,
}

pub fn test_app(server: &MockServer, overrides: &[(&str, &str)]) -> TestApp {
    let storage = Arc::new(MemoryBlobStore::default());
    let config = test_config(server, overrides);
    let state = AppState::new(&config, Some(storage.clone())).expect("test state");
    TestApp {
        router: tryon_studio::routes::router(state),
        storage,
    }
}

/// Send a request through the router and decode the JSON response.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A multipart part: field name, optional filename, content.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub data: &'a [u8],
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let boundary = "----tryon-test-boundary";
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match part.filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        part.name, filename
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

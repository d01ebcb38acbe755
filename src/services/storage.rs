use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use uuid::Uuid;

use crate::config::BlobSettings;

/// Object storage that hands back a publicly fetchable URL.
///
/// Providers only accept image URLs they can download, so every upload
/// must be readable without credentials.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// S3-compatible blob storage (R2, MinIO, AWS S3).
pub struct S3BlobStore {
    bucket: Box<Bucket>,
    public_url: String,
}

impl S3BlobStore {
    pub fn new(settings: &BlobSettings) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: "auto".to_string(),
            endpoint: settings.endpoint.clone(),
        };

        let credentials = Credentials::new(
            Some(settings.access_key.as_str()),
            Some(settings.secret_key.as_str()),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Config(e.to_string()))?;

        let bucket = Bucket::new(&settings.bucket, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self {
            bucket,
            public_url: settings.public_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let key = object_key(filename);
        let response = self
            .bucket
            .put_object_with_content_type(&key, data, content_type)
            .await?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Status(status));
        }

        tracing::debug!(key = %key, bytes = data.len(), "Uploaded object");
        Ok(format!("{}/{}", self.public_url, key))
    }
}

/// `uploads/<unix millis>-<short uuid>-<sanitized filename>`
pub fn object_key(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = if sanitized.trim_matches('_').is_empty() {
        "upload.png".to_string()
    } else {
        sanitized
    };

    let id = Uuid::new_v4().simple().to_string();
    format!(
        "uploads/{}-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        &id[..8],
        sanitized
    )
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 operation failed: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("Storage upload returned status {0}")]
    Status(u16),

    #[error("Storage configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_sanitizes() {
        let key = object_key("my photo (1).png");
        assert!(key.starts_with("uploads/"));
        assert!(key.ends_with("-my_photo__1_.png"));
    }

    #[test]
    fn test_object_key_blank_name() {
        assert!(object_key("").ends_with("-upload.png"));
        assert!(object_key("???").ends_with("-upload.png"));
    }

    #[test]
    fn test_object_keys_are_unique() {
        assert_ne!(object_key("a.png"), object_key("a.png"));
    }
}

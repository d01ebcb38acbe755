use base64::Engine;

/// MIME type used when a data URI header does not name one.
const DEFAULT_MIME: &str = "image/png";

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    /// File extension for the MIME type, used when naming uploads.
    pub fn extension(&self) -> &str {
        match self.mime.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "video/mp4" => "mp4",
            _ => "png",
        }
    }
}

pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

/// Build a base64 `data:` URI from an already-encoded payload.
pub fn to_data_uri(mime: &str, base64_payload: &str) -> String {
    format!("data:{mime};base64,{base64_payload}")
}

/// Decode a base64 `data:` URI into its MIME type and bytes.
pub fn parse_data_uri(value: &str) -> Result<DataUri, DataUriError> {
    let rest = value.strip_prefix("data:").ok_or(DataUriError::NotADataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;

    let mime = meta
        .strip_suffix(";base64")
        .ok_or(DataUriError::NotBase64)?;
    let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(DataUriError::Decode)?;

    Ok(DataUri {
        mime: mime.to_string(),
        bytes,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum DataUriError {
    #[error("Value is not a data: URI")]
    NotADataUri,

    #[error("Data URI has no payload")]
    MissingPayload,

    #[error("Only base64 data URIs are supported")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

use serde::{Deserialize, Deserializer, Serialize};

/// Body of POST /video.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    #[serde(default)]
    pub prompt: String,

    /// Public URL or `data:` URI of the starting frame.
    #[serde(default)]
    pub image_url: String,

    /// Clip length in seconds; clients send either "6" or 6.
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration: Option<String>,

    pub resolution: Option<String>,

    pub end_image_url: Option<String>,

    pub prompt_optimizer: Option<bool>,
}

impl VideoRequest {
    pub fn duration(&self) -> &str {
        self.duration.as_deref().unwrap_or("6")
    }

    pub fn resolution(&self) -> &str {
        self.resolution.as_deref().unwrap_or("768P")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub video_url: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_accepts_number_or_string() {
        let req: VideoRequest =
            serde_json::from_str(r#"{"prompt": "p", "imageUrl": "u", "duration": 10}"#).unwrap();
        assert_eq!(req.duration(), "10");

        let req: VideoRequest =
            serde_json::from_str(r#"{"prompt": "p", "imageUrl": "u", "duration": "6"}"#).unwrap();
        assert_eq!(req.duration(), "6");
    }

    #[test]
    fn test_defaults() {
        let req: VideoRequest =
            serde_json::from_str(r#"{"prompt": "p", "imageUrl": "u"}"#).unwrap();
        assert_eq!(req.duration(), "6");
        assert_eq!(req.resolution(), "768P");
        assert!(req.prompt_optimizer.is_none());
        assert!(req.end_image_url.is_none());
    }
}

use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Scene style for generated model photos and try-on prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Studio,
    Street,
    Runway,
    Catalog,
}

impl Style {
    /// Resolve a user-supplied style, falling back to studio for unknown values.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default()
    }
}

/// Body of POST /generate-model.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateModelRequest {
    #[serde(default)]
    #[garde(length(min = 1, max = 100))]
    pub ethnicity: String,

    #[serde(default)]
    #[garde(length(min = 1, max = 100))]
    pub gender: String,

    #[garde(skip)]
    pub style: Option<String>,

    #[garde(skip)]
    pub aspect_ratio: Option<String>,
}

impl GenerateModelRequest {
    pub fn style(&self) -> Style {
        Style::parse_or_default(self.style.as_deref())
    }

    pub fn aspect_ratio(&self) -> &str {
        self.aspect_ratio.as_deref().unwrap_or("3:4")
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateModelResponse {
    pub image_url: String,
    pub id: String,
}

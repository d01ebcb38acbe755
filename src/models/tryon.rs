use serde::Serialize;

/// Response of POST /tryon.
#[derive(Debug, Serialize)]
pub struct TryOnResponse {
    /// First output, kept for clients that only read a single URL.
    pub image_url: String,
    pub urls: Vec<String>,
    pub id: String,
    #[serde(rename = "authVariant")]
    pub auth_variant: String,
}

/// Optional form controls used to compose a prompt when none is given.
#[derive(Debug, Clone, Default)]
pub struct PromptControls {
    pub scene_style: Option<String>,
    pub fit_strength: Option<u8>,
    pub keep_body: Option<bool>,
}

impl PromptControls {
    pub fn is_empty(&self) -> bool {
        self.scene_style.is_none() && self.fit_strength.is_none() && self.keep_body.is_none()
    }
}

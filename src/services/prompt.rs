//! Deterministic prompt composition for generation and try-on requests.

use crate::models::generation::Style;
use crate::models::tryon::PromptControls;

/// Prompt used for try-on when the client sends neither a prompt nor controls.
pub const DEFAULT_TRYON_PROMPT: &str =
    "Realistic try-on; keep body pose, true color, clean e-commerce lighting.";

const TRYON_EDIT_INSTRUCTION: &str = "Dress the model with the garment realistically; \
preserve body and pose; keep lighting consistent; e-commerce look.";

/// Scene clause for model generation.
fn generation_clause(style: Style) -> &'static str {
    match style {
        Style::Studio => {
            "clean studio lighting, seamless light background, soft key light and gentle fill, photostudio look"
        }
        Style::Street => {
            "street fashion vibe, natural daylight, shallow depth of field, modern city backdrop, editorial feel"
        }
        Style::Runway => "runway ambience, spotlight, glossy floor reflections, fashion show atmosphere",
        Style::Catalog => "plain light background, evenly lit, e-commerce catalog style, neutral stance",
    }
}

/// Shorter scene sentence used inside try-on prompts.
fn tryon_clause(style: Style) -> &'static str {
    match style {
        Style::Studio => "Clean studio lighting, seamless background.",
        Style::Street => "Street fashion vibe, natural daylight, shallow DOF.",
        Style::Runway => "Runway atmosphere, spotlight, glossy floor.",
        Style::Catalog => "Plain light background, even lighting, catalog look.",
    }
}

/// Build a model-generation prompt. Unknown styles fall back to studio.
pub fn build_prompt(gender: &str, ethnicity: &str, style: &str) -> String {
    build_generation_prompt(gender, ethnicity, Style::parse_or_default(Some(style)))
}

pub fn build_generation_prompt(gender: &str, ethnicity: &str, style: Style) -> String {
    format!(
        "Full-body fashion model, {}, {} appearance. {}. \
         Neutral pose, arms relaxed, photorealistic, realistic human proportions, \
         high detail skin and hair, natural hands. \
         True-to-life colors, balanced exposure, high resolution.",
        gender.trim().to_lowercase(),
        ethnicity.trim().to_lowercase(),
        generation_clause(style),
    )
}

/// Resolve the try-on prompt: explicit text wins, then controls, then the default.
pub fn resolve_tryon_prompt(meta_prompt: Option<&str>, controls: &PromptControls) -> String {
    if let Some(text) = meta_prompt.map(str::trim).filter(|t| !t.is_empty()) {
        return text.to_string();
    }
    if controls.is_empty() {
        return DEFAULT_TRYON_PROMPT.to_string();
    }
    build_tryon_prompt(controls)
}

pub fn build_tryon_prompt(controls: &PromptControls) -> String {
    let style = Style::parse_or_default(controls.scene_style.as_deref());
    let fit = controls.fit_strength.unwrap_or(70).min(100);

    let mut prompt = format!(
        "{} {} Fit strength: {}/100.",
        TRYON_EDIT_INSTRUCTION,
        tryon_clause(style),
        fit
    );
    if controls.keep_body.unwrap_or(true) {
        prompt.push_str(" Keep original body and pose.");
    }
    prompt
}

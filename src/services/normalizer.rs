//! Output extraction for heterogeneous provider payloads.
//!
//! Providers (and different models behind the same provider) return results
//! in several shapes. Each shape is probed in a fixed precedence order and the
//! first one that yields anything wins.

use serde_json::Value;

use crate::services::data_uri;

/// MIME type assumed for inline base64 image payloads.
const INLINE_IMAGE_MIME: &str = "image/jpeg";

/// Default content type for video results that do not report one.
const DEFAULT_VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Extract output URLs (or data URIs) from a successful prediction payload.
///
/// Precedence:
/// 1. `output` as an array of strings and/or `{url}` objects
/// 2. `data.output`, same shapes
/// 3. `output_url`
/// 4. `output_urls`
/// 5. `image_base64`, then `data.image_base64`, as `data:` URIs
///
/// Returns an empty vector when nothing matches.
pub fn extract_outputs(payload: &Value) -> Vec<String> {
    let probes: [fn(&Value) -> Vec<String>; 6] = [
        |p| url_list(p.get("output")),
        |p| url_list(p.pointer("/data/output")),
        |p| single(p.get("output_url")),
        |p| string_list(p.get("output_urls")),
        |p| inline_image(p.get("image_base64")),
        |p| inline_image(p.pointer("/data/image_base64")),
    ];

    probes
        .iter()
        .map(|probe| probe(payload))
        .find(|urls| !urls.is_empty())
        .unwrap_or_default()
}

/// Array entries that are either plain strings or objects with a `url` field.
fn url_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            other => other.get("url").and_then(Value::as_str).map(String::from),
        })
        .collect()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items.iter().filter_map(Value::as_str).map(String::from).collect()
}

fn single(value: Option<&Value>) -> Vec<String> {
    value.and_then(Value::as_str).map(String::from).into_iter().collect()
}

fn inline_image(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_str)
        .map(|b64| data_uri::to_data_uri(INLINE_IMAGE_MIME, b64))
        .into_iter()
        .collect()
}

/// A video result extracted from a prediction payload.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOutput {
    pub url: String,
    pub content_type: String,
    pub description: Option<String>,
}

/// Extract a video result.
///
/// Looks for `video.url`, `result.video.url` and `url` at the payload root,
/// under `output` and under `data`, in that order. Then accepts a bare string
/// `output`, and finally falls back to the first entry of [`extract_outputs`].
pub fn extract_video(payload: &Value) -> Option<VideoOutput> {
    let roots = [Some(payload), payload.get("output"), payload.get("data")];

    for root in roots.into_iter().flatten() {
        for pointer in ["/video", "/result/video"] {
            let Some(video) = root.pointer(pointer) else {
                continue;
            };
            if let Some(url) = video.get("url").and_then(Value::as_str) {
                return Some(VideoOutput {
                    url: url.to_string(),
                    content_type: video
                        .get("content_type")
                        .and_then(Value::as_str)
                        .unwrap_or(DEFAULT_VIDEO_CONTENT_TYPE)
                        .to_string(),
                    description: description(payload, root),
                });
            }
        }

        if let Some(url) = root.get("url").and_then(Value::as_str) {
            return Some(VideoOutput {
                url: url.to_string(),
                content_type: DEFAULT_VIDEO_CONTENT_TYPE.to_string(),
                description: description(payload, root),
            });
        }
    }

    let url = payload
        .get("output")
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| extract_outputs(payload).into_iter().next());

    url.map(|url| VideoOutput {
        url,
        content_type: DEFAULT_VIDEO_CONTENT_TYPE.to_string(),
        description: description(payload, payload),
    })
}

fn description(payload: &Value, root: &Value) -> Option<String> {
    root.get("description")
        .or_else(|| payload.get("description"))
        .and_then(Value::as_str)
        .map(String::from)
}

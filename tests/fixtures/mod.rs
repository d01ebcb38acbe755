//! Provider payload and image fixtures.

use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::{json, Value};
use std::io::Cursor;

pub const JOB_ID: &str = "pred-7f3a";

/// Prediction endpoint path on the mock provider.
pub const PREDICTION_PATH: &str = "/v1/prediction/";

pub fn job_path() -> String {
    format!("{PREDICTION_PATH}{JOB_ID}")
}

pub fn created() -> Value {
    json!({"id": JOB_ID, "status": "starting"})
}

pub fn pending() -> Value {
    json!({"id": JOB_ID, "status": "processing"})
}

pub fn succeeded_with_urls(urls: &[&str]) -> Value {
    let output: Vec<Value> = urls.iter().map(|u| json!({"url": u})).collect();
    json!({"id": JOB_ID, "status": "succeeded", "output": output})
}

pub fn failed() -> Value {
    json!({"id": JOB_ID, "status": "failed", "error": "content policy violation"})
}

/// A small PNG with a transparent border around an opaque square.
pub fn png_bytes() -> Vec<u8> {
    let mut img = RgbaImage::new(12, 12);
    for y in 4..8 {
        for x in 4..8 {
            img.put_pixel(x, y, Rgba([30, 60, 90, 255]));
        }
    }
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

//! Crop an image to the bounding box of its visible (non-transparent) pixels.

use image::{imageops, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Alpha values at or below this are treated as transparent.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 4;

/// Pixel rectangle inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tightest box containing every pixel whose alpha exceeds `threshold`.
///
/// A fully transparent image collapses to a 1×1 box in its bottom-right
/// corner; an image with a zero dimension yields a 1×1 box at the origin.
pub fn opaque_bounds(img: &RgbaImage, threshold: u8) -> Bounds {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Bounds { x: 0, y: 0, width: 1, height: 1 };
    }

    let visible = |x: u32, y: u32| img.get_pixel(x, y).0[3] > threshold;
    let row_has = |y: u32| (0..width).any(|x| visible(x, y));
    let col_has = |x: u32| (0..height).any(|y| visible(x, y));

    let (mut top, mut bottom) = (0, height - 1);
    while top < bottom && !row_has(top) {
        top += 1;
    }
    while bottom > top && !row_has(bottom) {
        bottom -= 1;
    }

    let (mut left, mut right) = (0, width - 1);
    while left < right && !col_has(left) {
        left += 1;
    }
    while right > left && !col_has(right) {
        right -= 1;
    }

    Bounds {
        x: left,
        y: top,
        width: (right - left + 1).max(1),
        height: (bottom - top + 1).max(1),
    }
}

/// Re-render only the visible region into a new buffer.
pub fn trim_transparent(img: &RgbaImage, threshold: u8) -> RgbaImage {
    let b = opaque_bounds(img, threshold);
    if img.width() == 0 || img.height() == 0 {
        return RgbaImage::new(1, 1);
    }
    imageops::crop_imm(img, b.x, b.y, b.width, b.height).to_image()
}

/// Decode an encoded image, trim it, and re-encode it as PNG.
pub fn trim_png(bytes: &[u8], threshold: u8) -> Result<Vec<u8>, TrimError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    let trimmed = trim_transparent(&decoded, threshold);

    tracing::debug!(
        from_width = decoded.width(),
        from_height = decoded.height(),
        to_width = trimmed.width(),
        to_height = trimmed.height(),
        "Trimmed transparent border"
    );

    let mut out = Cursor::new(Vec::new());
    trimmed.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[derive(Debug, thiserror::Error)]
pub enum TrimError {
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),
}

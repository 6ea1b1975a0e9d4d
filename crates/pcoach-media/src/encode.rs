//! JPEG + base64 encoding for frames.
//!
//! Two encodings exist: the full feedback image (exact resize, high quality)
//! persisted as an artifact, and a small preview sent to the vision model.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;

/// Default feedback image size.
pub const FEEDBACK_WIDTH: u32 = 1280;
pub const FEEDBACK_HEIGHT: u32 = 720;
/// Default feedback JPEG quality.
pub const FEEDBACK_QUALITY: u8 = 100;

/// Default bounding box for model previews.
pub const PREVIEW_MAX_SIZE: u32 = 256;
/// Default preview JPEG quality.
pub const PREVIEW_QUALITY: u8 = 70;

fn ensure_non_empty(frame: &Frame) -> MediaResult<()> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(MediaError::encoding("frame has zero size"));
    }
    Ok(())
}

/// Encode a frame as JPEG bytes at the given quality (clamped to 1..=100).
pub fn encode_jpeg(frame: &Frame, quality: u8) -> MediaResult<Vec<u8>> {
    ensure_non_empty(frame)?;

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder
        .encode(
            frame.image().as_raw(),
            frame.width(),
            frame.height(),
            ColorType::Rgb8,
        )
        .map_err(|e| MediaError::encoding(e.to_string()))?;

    Ok(bytes)
}

/// JPEG-encode a frame at its own size and base64 the result.
pub fn encode_base64_jpeg(frame: &Frame, quality: u8) -> MediaResult<String> {
    Ok(STANDARD.encode(encode_jpeg(frame, quality)?))
}

/// Resize to exactly `width x height`, JPEG-encode and base64 the result.
pub fn encode_feedback_image(
    frame: &Frame,
    width: u32,
    height: u32,
    quality: u8,
) -> MediaResult<String> {
    if width == 0 || height == 0 {
        return Err(MediaError::encoding(format!(
            "invalid feedback size {width}x{height}"
        )));
    }
    ensure_non_empty(frame)?;
    encode_base64_jpeg(&frame.resized(width, height), quality)
}

/// Dimensions that fit `width x height` inside a `max x max` box.
///
/// Aspect ratio is preserved and images are never upscaled.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = (max as f64 / width as f64).min(max as f64 / height as f64);
    let fitted_w = ((width as f64 * scale).round() as u32).max(1);
    let fitted_h = ((height as f64 * scale).round() as u32).max(1);
    (fitted_w, fitted_h)
}

/// Downscale into a `max_size` box, JPEG-encode and base64 the result.
pub fn encode_preview_image(frame: &Frame, max_size: u32, quality: u8) -> MediaResult<String> {
    if max_size == 0 {
        return Err(MediaError::encoding("preview size must be positive"));
    }
    ensure_non_empty(frame)?;
    let (width, height) = fit_within(frame.width(), frame.height(), max_size);
    encode_base64_jpeg(&frame.resized(width, height), quality)
}

//! OpenCV `VideoCapture` frame decoding.

use std::path::Path;

use opencv::{
    core::{AlgorithmHint, Mat},
    imgproc,
    prelude::*,
    videoio::{VideoCapture, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_COUNT},
};

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;
use crate::source::{FrameReader, VideoSource};

/// Video source backed by OpenCV.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvSource;

impl OpenCvSource {
    pub fn new() -> Self {
        Self
    }
}

impl VideoSource for OpenCvSource {
    fn open(&self, path: &Path) -> MediaResult<Box<dyn FrameReader>> {
        let path_str = path
            .to_str()
            .ok_or_else(|| MediaError::video_open(format!("non UTF-8 path: {}", path.display())))?;

        let cap = VideoCapture::from_file(path_str, CAP_ANY)
            .map_err(|e| MediaError::video_open(format!("{}: {e}", path.display())))?;
        if !cap.is_opened().unwrap_or(false) {
            return Err(MediaError::video_open(path.display().to_string()));
        }

        Ok(Box::new(OpenCvReader { cap }))
    }

    fn name(&self) -> &'static str {
        "opencv"
    }
}

struct OpenCvReader {
    cap: VideoCapture,
}

impl FrameReader for OpenCvReader {
    fn fps(&self) -> Option<f64> {
        self.cap.get(CAP_PROP_FPS).ok()
    }

    fn frame_count(&self) -> Option<u64> {
        self.cap
            .get(CAP_PROP_FRAME_COUNT)
            .ok()
            .filter(|count| count.is_finite() && *count > 0.0)
            .map(|count| count as u64)
    }

    fn skip_frame(&mut self) -> MediaResult<bool> {
        self.cap
            .grab()
            .map_err(|e| MediaError::internal(format!("grab: {e}")))
    }

    fn read_frame(&mut self) -> MediaResult<Option<Frame>> {
        let mut mat = Mat::default();
        let ok = self
            .cap
            .read(&mut mat)
            .map_err(|e| MediaError::internal(format!("read: {e}")))?;
        if !ok || mat.empty() {
            return Ok(None);
        }
        mat_to_frame(&mat).map(Some)
    }
}

/// Convert a BGR `Mat` into an RGB [`Frame`].
fn mat_to_frame(mat: &Mat) -> MediaResult<Frame> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(
        mat,
        &mut rgb,
        imgproc::COLOR_BGR2RGB,
        0,
        AlgorithmHint::ALGO_HINT_DEFAULT,
    )
    .map_err(|e| MediaError::internal(format!("bgr2rgb: {e}")))?;

    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let data = rgb
        .data_bytes()
        .map_err(|e| MediaError::internal(format!("frame bytes: {e}")))?
        .to_vec();

    image::RgbImage::from_raw(width, height, data)
        .map(Frame::new)
        .ok_or_else(|| MediaError::internal("frame buffer size mismatch"))
}

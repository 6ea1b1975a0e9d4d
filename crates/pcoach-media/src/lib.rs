//! Media handling for the presentation feedback pipeline.
//!
//! This crate provides:
//! - Sequential frame decoding behind the [`VideoSource`] trait (FFmpeg pipe,
//!   optional OpenCV, in-memory)
//! - Fixed-cadence frame sampling
//! - JPEG/base64 encoding for feedback images and model previews
//! - The [`LandmarkDetector`] seam and the geometric scorer built on it

pub mod analysis;
#[cfg(feature = "opencv")]
pub mod capture;
pub mod detector;
pub mod encode;
pub mod error;
pub mod ffmpeg;
pub mod frame;
pub mod probe;
pub mod sampler;
pub mod scoring;
pub mod source;

pub use analysis::{analyze_frame, score_landmarks, LandmarkState};
#[cfg(feature = "opencv")]
pub use capture::OpenCvSource;
pub use detector::LandmarkDetector;
pub use encode::{
    encode_base64_jpeg, encode_feedback_image, encode_jpeg, encode_preview_image, fit_within,
    FEEDBACK_HEIGHT, FEEDBACK_QUALITY, FEEDBACK_WIDTH, PREVIEW_MAX_SIZE, PREVIEW_QUALITY,
};
pub use error::{MediaError, MediaResult};
pub use ffmpeg::FfmpegSource;
pub use frame::Frame;
pub use probe::{probe_video, VideoInfo};
pub use sampler::{target_indices, FrameSampler};
pub use source::{
    effective_fps, video_duration, FrameReader, MemoryClip, MemorySource, StreamInfo,
    VideoSource, DEFAULT_FPS,
};

//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use pcoach_media::{
    FEEDBACK_HEIGHT, FEEDBACK_QUALITY, FEEDBACK_WIDTH, PREVIEW_MAX_SIZE, PREVIEW_QUALITY,
};
use pcoach_models::Thresholds;

use crate::error::{WorkerError, WorkerResult};

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Frame decoding backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoBackend {
    Ffmpeg,
    OpenCv,
}

impl VideoBackend {
    fn from_env_value(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "opencv" => VideoBackend::OpenCv,
            _ => VideoBackend::Ffmpeg,
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Segment length in seconds
    pub segment_length_secs: u32,
    /// Seconds between sampled frames
    pub frame_interval_secs: f64,
    /// Canonical size sampled frames are resized to
    pub frame_width: u32,
    pub frame_height: u32,
    /// Size of the persisted feedback image
    pub feedback_image_width: u32,
    pub feedback_image_height: u32,
    pub feedback_jpeg_quality: u8,
    /// Bounding box for the preview sent to the model
    pub preview_max_size: u32,
    pub preview_jpeg_quality: u8,
    /// Directory feedback images are written to
    pub feedback_dir: PathBuf,
    /// Optional user prompt template file
    pub prompt_path: Option<PathBuf>,
    pub thresholds: Thresholds,
    pub video_backend: VideoBackend,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            segment_length_secs: 60,
            frame_interval_secs: 1.0,
            frame_width: 640,
            frame_height: 360,
            feedback_image_width: FEEDBACK_WIDTH,
            feedback_image_height: FEEDBACK_HEIGHT,
            feedback_jpeg_quality: FEEDBACK_QUALITY,
            preview_max_size: PREVIEW_MAX_SIZE,
            preview_jpeg_quality: PREVIEW_QUALITY,
            feedback_dir: PathBuf::from("storage/output_feedback_frame"),
            prompt_path: None,
            thresholds: Thresholds::default(),
            video_backend: VideoBackend::Ffmpeg,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            segment_length_secs: env_parse("SEGMENT_LENGTH_SECS")
                .unwrap_or(defaults.segment_length_secs),
            frame_interval_secs: env_parse("FRAME_INTERVAL_SECS")
                .unwrap_or(defaults.frame_interval_secs),
            frame_width: env_parse("FRAME_WIDTH").unwrap_or(defaults.frame_width),
            frame_height: env_parse("FRAME_HEIGHT").unwrap_or(defaults.frame_height),
            feedback_image_width: env_parse("FEEDBACK_IMAGE_WIDTH")
                .unwrap_or(defaults.feedback_image_width),
            feedback_image_height: env_parse("FEEDBACK_IMAGE_HEIGHT")
                .unwrap_or(defaults.feedback_image_height),
            feedback_jpeg_quality: env_parse("FEEDBACK_JPEG_QUALITY")
                .unwrap_or(defaults.feedback_jpeg_quality),
            preview_max_size: env_parse("PREVIEW_MAX_SIZE").unwrap_or(defaults.preview_max_size),
            preview_jpeg_quality: env_parse("PREVIEW_JPEG_QUALITY")
                .unwrap_or(defaults.preview_jpeg_quality),
            feedback_dir: std::env::var("FEEDBACK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.feedback_dir),
            prompt_path: std::env::var("PROMPT_PATH").ok().map(PathBuf::from),
            thresholds: Thresholds {
                posture: env_parse("THRESHOLD_POSTURE").unwrap_or(defaults.thresholds.posture),
                gaze: env_parse("THRESHOLD_GAZE").unwrap_or(defaults.thresholds.gaze),
                gestures: env_parse("THRESHOLD_GESTURES").unwrap_or(defaults.thresholds.gestures),
                movement: env_parse("THRESHOLD_MOVEMENT").unwrap_or(defaults.thresholds.movement),
            },
            video_backend: std::env::var("VIDEO_BACKEND")
                .map(|v| VideoBackend::from_env_value(&v))
                .unwrap_or(defaults.video_backend),
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> WorkerResult<()> {
        if self.segment_length_secs == 0 {
            return Err(WorkerError::config_error("segment length must be positive"));
        }
        if !(self.frame_interval_secs.is_finite() && self.frame_interval_secs > 0.0) {
            return Err(WorkerError::config_error("frame interval must be positive"));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(WorkerError::config_error("frame size must be positive"));
        }
        if self.feedback_image_width == 0 || self.feedback_image_height == 0 {
            return Err(WorkerError::config_error("feedback image size must be positive"));
        }
        Ok(())
    }
}

/// Vision model client configuration.
#[derive(Debug, Clone)]
pub struct VisionClientConfig {
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl VisionClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 800,
            timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables. `OPENAI_API_KEY` is required.
    pub fn from_env() -> WorkerResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| WorkerError::config_error("OPENAI_API_KEY not set"))?;
        let defaults = Self::new(api_key);

        Ok(Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url.clone()),
            model: std::env::var("VISION_MODEL").unwrap_or(defaults.model.clone()),
            max_tokens: env_parse("VISION_MAX_TOKENS").unwrap_or(defaults.max_tokens),
            timeout: env_parse("VISION_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            ..defaults
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.segment_length_secs, 60);
        assert_eq!(config.frame_interval_secs, 1.0);
        assert_eq!((config.frame_width, config.frame_height), (640, 360));
        assert_eq!(
            (config.feedback_image_width, config.feedback_image_height),
            (1280, 720)
        );
        assert_eq!(config.feedback_jpeg_quality, 100);
        assert_eq!((config.preview_max_size, config.preview_jpeg_quality), (256, 70));
        assert_eq!(config.thresholds, Thresholds::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = PipelineConfig {
            frame_interval_secs: 0.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(WorkerError::Config(_))));
    }

    #[test]
    fn test_vision_defaults() {
        let config = VisionClientConfig::new("sk-test");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 800);
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_video_backend_parsing() {
        assert_eq!(VideoBackend::from_env_value("OpenCV"), VideoBackend::OpenCv);
        assert_eq!(VideoBackend::from_env_value("ffmpeg"), VideoBackend::Ffmpeg);
        assert_eq!(VideoBackend::from_env_value("other"), VideoBackend::Ffmpeg);
    }
}

//! Worker error types.
//!
//! `Display` carries the internal diagnostic and is only ever logged.
//! Callers get [`WorkerError::status_code`] and [`WorkerError::user_message`].

use pcoach_media::MediaError;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Failure reported by the vision model provider.
///
/// One variant per provider condition; each maps to exactly one
/// caller-visible status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Provider authentication failed: {0}")]
    Authentication(String),

    #[error("Provider permission denied: {0}")]
    PermissionDenied(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Provider rejected the request: {0}")]
    BadRequest(String),

    #[error("Provider reported a conflict: {0}")]
    Conflict(String),

    #[error("Provider resource not found: {0}")]
    NotFound(String),

    #[error("Provider could not process the input: {0}")]
    Unprocessable(String),

    #[error("Provider server error: {0}")]
    Server(String),

    #[error("Provider request timed out: {0}")]
    Timeout(String),

    #[error("Provider connection failed: {0}")]
    Connection(String),
}

impl ProviderError {
    /// Classify a non-success HTTP response from the provider.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            400 => Self::BadRequest(body),
            401 => Self::Authentication(body),
            403 => Self::PermissionDenied(body),
            404 => Self::NotFound(body),
            408 => Self::Timeout(body),
            409 => Self::Conflict(body),
            422 => Self::Unprocessable(body),
            429 => Self::RateLimited(body),
            400..=499 => Self::BadRequest(format!("HTTP {status}: {body}")),
            _ => Self::Server(format!("HTTP {status}: {body}")),
        }
    }

    /// Classify a transport failure (no HTTP response).
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }

    /// Caller-visible HTTP-equivalent status.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Authentication(_) => 401,
            Self::PermissionDenied(_) => 403,
            Self::RateLimited(_) => 429,
            Self::BadRequest(_) => 400,
            Self::Conflict(_) => 409,
            Self::NotFound(_) => 404,
            Self::Unprocessable(_) => 422,
            Self::Server(_) => 502,
            Self::Timeout(_) => 504,
            Self::Connection(_) => 503,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "The feedback model rejected our credentials.",
            Self::PermissionDenied(_) => "The feedback model denied access to this request.",
            Self::RateLimited(_) => "The feedback model is rate limiting requests. Please try again later.",
            Self::BadRequest(_) => "The feedback model rejected the request.",
            Self::Conflict(_) => "The feedback model reported a conflicting request.",
            Self::NotFound(_) => "The configured feedback model was not found.",
            Self::Unprocessable(_) => "The feedback model could not process this frame.",
            Self::Server(_) => "The feedback model is currently unavailable.",
            Self::Timeout(_) => "The feedback model took too long to respond.",
            Self::Connection(_) => "Could not reach the feedback model.",
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Could not open video: {0}")]
    VideoOpen(String),

    #[error("Segment extraction failed: {0}")]
    SegmentExtraction(String),

    #[error("Feedback parse error: {0}")]
    Parse(String),

    #[error("Feedback construction failed: {0}")]
    FeedbackConstruction(String),

    #[error("Image encoding failed: {0}")]
    Encoding(String),

    #[error("Artifact write failed: {0}")]
    ArtifactWrite(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Prompt loading failed: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Media error: {0}")]
    Media(#[source] MediaError),
}

impl WorkerError {
    pub fn video_open(msg: impl Into<String>) -> Self {
        Self::VideoOpen(msg.into())
    }

    pub fn segment_extraction(msg: impl Into<String>) -> Self {
        Self::SegmentExtraction(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn feedback_construction(msg: impl Into<String>) -> Self {
        Self::FeedbackConstruction(msg.into())
    }

    pub fn artifact_write(msg: impl Into<String>) -> Self {
        Self::ArtifactWrite(msg.into())
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Caller-visible HTTP-equivalent status.
    pub fn status_code(&self) -> u16 {
        match self {
            WorkerError::Parse(_) => 400,
            WorkerError::VideoOpen(_) | WorkerError::SegmentExtraction(_) => 422,
            WorkerError::Provider(e) => e.status_code(),
            WorkerError::FeedbackConstruction(_)
            | WorkerError::Encoding(_)
            | WorkerError::ArtifactWrite(_)
            | WorkerError::Prompt(_)
            | WorkerError::Config(_)
            | WorkerError::Media(_) => 500,
        }
    }

    /// Message safe to show to the caller; never includes internal detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            WorkerError::VideoOpen(_) => "The video file could not be read.",
            WorkerError::SegmentExtraction(_) => {
                "Frames could not be extracted. The video file may be damaged."
            }
            WorkerError::Parse(_) => "The feedback response could not be decoded.",
            WorkerError::FeedbackConstruction(_) => "Feedback could not be assembled.",
            WorkerError::Encoding(_) => "A feedback image could not be encoded.",
            WorkerError::ArtifactWrite(_) => "A feedback image could not be saved.",
            WorkerError::Provider(e) => e.user_message(),
            WorkerError::Prompt(_) => "The feedback prompt could not be loaded.",
            WorkerError::Config(_) => "The feedback service is misconfigured.",
            WorkerError::Media(_) => "An internal error occurred while processing the video.",
        }
    }
}

impl From<MediaError> for WorkerError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::VideoOpen(msg) | MediaError::InvalidVideo(msg) => Self::VideoOpen(msg),
            MediaError::FileNotFound(path) => Self::VideoOpen(path.display().to_string()),
            MediaError::NoFramesFound(msg) => Self::SegmentExtraction(msg),
            MediaError::Encoding(msg) => Self::Encoding(msg),
            other => Self::Media(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_http_status() {
        assert!(matches!(
            ProviderError::from_http_status(401, "bad key"),
            ProviderError::Authentication(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(403, ""),
            ProviderError::PermissionDenied(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(429, ""),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(409, ""),
            ProviderError::Conflict(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(422, ""),
            ProviderError::Unprocessable(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(413, ""),
            ProviderError::BadRequest(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(500, ""),
            ProviderError::Server(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(503, ""),
            ProviderError::Server(_)
        ));
    }

    #[test]
    fn test_provider_status_codes_are_distinct() {
        let errors = [
            ProviderError::Authentication(String::new()),
            ProviderError::PermissionDenied(String::new()),
            ProviderError::RateLimited(String::new()),
            ProviderError::BadRequest(String::new()),
            ProviderError::Conflict(String::new()),
            ProviderError::NotFound(String::new()),
            ProviderError::Unprocessable(String::new()),
            ProviderError::Server(String::new()),
            ProviderError::Timeout(String::new()),
            ProviderError::Connection(String::new()),
        ];
        let mut codes: Vec<u16> = errors.iter().map(ProviderError::status_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_worker_status_codes() {
        assert_eq!(WorkerError::parse("x").status_code(), 400);
        assert_eq!(WorkerError::feedback_construction("x").status_code(), 500);
        assert_eq!(WorkerError::segment_extraction("x").status_code(), 422);
        assert_eq!(
            WorkerError::from(ProviderError::RateLimited("slow down".into())).status_code(),
            429
        );
    }

    #[test]
    fn test_user_message_does_not_leak_details() {
        let err = WorkerError::artifact_write("/srv/secret/path.jpg: permission denied");
        assert!(!err.user_message().contains("/srv/secret"));
        assert!(err.to_string().contains("/srv/secret"));
    }

    #[test]
    fn test_media_errors_map_to_pipeline_kinds() {
        assert!(matches!(
            WorkerError::from(MediaError::video_open("a.mp4")),
            WorkerError::VideoOpen(_)
        ));
        assert!(matches!(
            WorkerError::from(MediaError::no_frames_found("a.mp4")),
            WorkerError::SegmentExtraction(_)
        ));
        assert!(matches!(
            WorkerError::from(MediaError::encoding("codec")),
            WorkerError::Encoding(_)
        ));
        assert!(matches!(
            WorkerError::from(MediaError::FfmpegNotFound),
            WorkerError::Media(_)
        ));
    }
}

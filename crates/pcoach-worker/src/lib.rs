//! Presentation feedback worker.
//!
//! Drives the two-stage pipeline: a cheap geometric pre-screen narrows a
//! video down to problematic frames, and only those are sent to a
//! vision-language model for written feedback.

pub mod artifact;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod filter;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod processor;
pub mod prompt;
pub mod vision;

pub use artifact::ArtifactWriter;
pub use config::{PipelineConfig, VideoBackend, VisionClientConfig};
pub use enrichment::EnrichmentClient;
pub use error::{ProviderError, WorkerError, WorkerResult};
pub use filter::{ProblematicFrame, SegmentFilter};
pub use logging::VideoLogger;
pub use parser::parse_feedback_text;
pub use processor::{segment_starts, VideoProcessor};
pub use prompt::{PromptTemplate, SYSTEM_INSTRUCTION};
pub use vision::{FeedbackModel, FeedbackRequest, VisionClient};

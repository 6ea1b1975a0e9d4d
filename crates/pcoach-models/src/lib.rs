//! Shared data models for the presentation feedback pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Per-frame geometric scores
//! - Detected pose/face/hand landmarks
//! - The five-section feedback schema returned by the vision model
//! - Feedback records and the final report handed to callers
//! - Timestamp formatting shared by records and artifact names

pub mod feedback;
pub mod landmarks;
pub mod scores;
pub mod timestamp;

// Re-export common types
pub use feedback::{
    FeedbackDetails, FeedbackRecord, FeedbackReport, FeedbackSections, Problem, SECTION_KEYS,
};
pub use landmarks::{FaceLandmarks, HandLandmarks, Landmark, LandmarkSet, PoseLandmarks};
pub use scores::{round2, ScoreVector, Thresholds};
pub use timestamp::{format_timestamp, safe_timestamp};

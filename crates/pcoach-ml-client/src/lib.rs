//! Client for the landmark detection sidecar.
//!
//! Pose, face mesh and hand keypoints are produced by a separate service.
//! [`LandmarkClient`] sends it one encoded frame at a time and implements
//! [`pcoach_media::LandmarkDetector`] so the scorer can use it directly.

pub mod client;
pub mod error;
pub mod types;

pub use client::{LandmarkClient, LandmarkClientConfig};
pub use error::{MlError, MlResult};
pub use types::{HealthResponse, LandmarkRequest, LandmarkResponse};

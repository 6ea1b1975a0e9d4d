//! Landmark detector seam.

use async_trait::async_trait;
use pcoach_models::LandmarkSet;

use crate::error::MediaResult;
use crate::frame::Frame;

/// Finds pose, face and hand landmarks in a frame.
///
/// An empty [`LandmarkSet`] is a valid answer; errors are reserved for the
/// detector itself failing.
#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    /// Detect landmarks in a single frame.
    async fn detect(&self, frame: &Frame) -> MediaResult<LandmarkSet>;

    /// Detector name for logging.
    fn name(&self) -> &'static str;
}

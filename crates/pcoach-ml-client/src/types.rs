//! Wire types for the landmark service.

use pcoach_models::LandmarkSet;
use serde::{Deserialize, Serialize};

/// One frame to analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkRequest {
    /// JPEG bytes, base64 encoded
    pub image_base64: String,
    pub width: u32,
    pub height: u32,
}

/// Detection result for one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkResponse {
    #[serde(default)]
    pub landmarks: LandmarkSet,
    /// Inference time reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

//! Detected anatomical keypoints.
//!
//! Coordinates are normalized to the image plane: `x` and `y` in `[0, 1]`
//! relative to frame width and height. Index layouts follow the common
//! 33-point pose, 468-point face mesh and 21-point hand topologies.
//!
//! # Pose (33 points)
//! - 0: Nose
//! - 11 / 12: Left / right shoulder
//!
//! # Face mesh (468 points)
//! - 33: Left eye outer corner
//! - 263: Right eye outer corner
//!
//! # Hand (21 points)
//! - 0: Wrist
//! - 4: Thumb tip
//! - 8: Index finger tip

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }

    /// Euclidean distance in the normalized image plane.
    pub fn distance(&self, other: &Landmark) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Body pose keypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PoseLandmarks {
    pub points: Vec<Landmark>,
}

impl PoseLandmarks {
    pub const NOSE: usize = 0;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    /// Number of points in a complete pose.
    pub const LEN: usize = 33;

    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn nose(&self) -> Option<&Landmark> {
        self.points.get(Self::NOSE)
    }

    /// Midpoint between both shoulders.
    pub fn shoulder_center(&self) -> Option<Landmark> {
        let left = self.points.get(Self::LEFT_SHOULDER)?;
        let right = self.points.get(Self::RIGHT_SHOULDER)?;
        Some(Landmark::new((left.x + right.x) / 2.0, (left.y + right.y) / 2.0))
    }
}

/// Face mesh keypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FaceLandmarks {
    pub points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub const LEFT_EYE: usize = 33;
    pub const RIGHT_EYE: usize = 263;
    pub const LEN: usize = 468;

    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn left_eye(&self) -> Option<&Landmark> {
        self.points.get(Self::LEFT_EYE)
    }

    pub fn right_eye(&self) -> Option<&Landmark> {
        self.points.get(Self::RIGHT_EYE)
    }
}

/// Hand keypoints for one detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HandLandmarks {
    pub points: Vec<Landmark>,
}

impl HandLandmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const LEN: usize = 21;

    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn wrist(&self) -> Option<&Landmark> {
        self.points.get(Self::WRIST)
    }

    pub fn thumb_tip(&self) -> Option<&Landmark> {
        self.points.get(Self::THUMB_TIP)
    }

    pub fn index_tip(&self) -> Option<&Landmark> {
        self.points.get(Self::INDEX_FINGER_TIP)
    }
}

/// Everything the landmark detector found in one frame.
///
/// Each part is optional; a missing detection is a valid outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkSet {
    #[serde(default)]
    pub pose: Option<PoseLandmarks>,
    #[serde(default)]
    pub face: Option<FaceLandmarks>,
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

impl LandmarkSet {
    /// A detection result with nothing found.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pose.is_none() && self.face.is_none() && self.hands.is_empty()
    }

    /// The primary (first) detected hand.
    pub fn primary_hand(&self) -> Option<&HandLandmarks> {
        self.hands.first()
    }
}

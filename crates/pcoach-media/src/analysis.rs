//! Per-frame analysis with sticky landmark state.
//!
//! [`analyze_frame`] runs the detector on one frame and scores the result
//! against the landmarks carried over from earlier frames. The carried state
//! is an explicit value: callers pass it in and get the next one back, so it
//! never outlives the segment that owns it.

use metrics::counter;
use pcoach_models::{HandLandmarks, LandmarkSet, PoseLandmarks, ScoreVector};
use tracing::{debug, warn};

use crate::detector::LandmarkDetector;
use crate::frame::Frame;
use crate::scoring::{
    excessive_gesture_score, gesture_aggregate, hand_movement_score, head_position_score,
    lack_of_eye_contact_score, sudden_movement_score,
};

/// Last known pose and primary hand within one segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkState {
    pub previous_pose: Option<PoseLandmarks>,
    pub previous_hand: Option<HandLandmarks>,
}

impl LandmarkState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a detection into the state.
    ///
    /// A present pose or hand replaces the carried one; an absent detection
    /// keeps the last known value.
    pub fn advance(mut self, landmarks: &LandmarkSet) -> Self {
        if let Some(pose) = &landmarks.pose {
            self.previous_pose = Some(pose.clone());
        }
        if let Some(hand) = landmarks.primary_hand() {
            self.previous_hand = Some(hand.clone());
        }
        self
    }
}

/// Score a detection result against the carried state.
///
/// Pure: no detector, no I/O.
pub fn score_landmarks(
    landmarks: &LandmarkSet,
    width: u32,
    height: u32,
    state: &LandmarkState,
) -> ScoreVector {
    let posture = head_position_score(landmarks.pose.as_ref(), width, height);
    let sudden_movement = landmarks
        .pose
        .as_ref()
        .map(|pose| sudden_movement_score(pose, state.previous_pose.as_ref()))
        .unwrap_or(0.0);
    let gaze = lack_of_eye_contact_score(landmarks.face.as_ref(), width);

    let excessive = landmarks
        .hands
        .iter()
        .map(excessive_gesture_score)
        .reduce(f64::max);
    let hand_movement = state.previous_hand.as_ref().and_then(|previous| {
        landmarks
            .hands
            .iter()
            .map(|hand| hand_movement_score(hand, Some(previous)))
            .reduce(f64::max)
    });
    let gestures = gesture_aggregate(excessive, hand_movement);

    ScoreVector::new(posture, gaze, gestures, sudden_movement)
}

/// Detect and score one frame, returning the scores and the next state.
///
/// A detector failure is not fatal: the frame scores all zero and the state
/// is returned unchanged.
pub async fn analyze_frame(
    detector: &dyn LandmarkDetector,
    frame: &Frame,
    state: LandmarkState,
) -> (ScoreVector, LandmarkState) {
    counter!("pcoach_frames_scored_total").increment(1);

    let landmarks = match detector.detect(frame).await {
        Ok(landmarks) => landmarks,
        Err(e) => {
            counter!("pcoach_detection_failures_total").increment(1);
            warn!(detector = detector.name(), "Landmark detection failed: {}", e);
            return (ScoreVector::zero(), state);
        }
    };

    let scores = score_landmarks(&landmarks, frame.width(), frame.height(), &state);
    debug!(
        posture = scores.posture,
        gaze = scores.gaze,
        gestures = scores.gestures,
        sudden_movement = scores.sudden_movement,
        "Scored frame"
    );

    (scores, state.advance(&landmarks))
}

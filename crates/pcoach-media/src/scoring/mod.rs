//! Geometric scorer.
//!
//! Cheap, deterministic heuristics over detected landmarks. Each function
//! returns a score in `[0, 1]` rounded to two decimals, where higher means
//! "more likely a non-verbal problem". A missing detection is never scored
//! as a problem.

pub mod gaze;
pub mod gesture;
pub mod movement;
pub mod posture;

pub use gaze::lack_of_eye_contact_score;
pub use gesture::{excessive_gesture_score, gesture_aggregate, hand_movement_score};
pub use movement::sudden_movement_score;
pub use posture::head_position_score;

/// Score used for delta-based signals when there is no previous frame.
///
/// Distinct from `0.0` ("no motion"): it marks motion as unknown.
pub const UNKNOWN_MOTION_SCORE: f64 = 0.1;

/// Score used when the gesture aggregate lacks one of its inputs.
pub const INSUFFICIENT_GESTURE_SIGNAL: f64 = 0.1;

#[cfg(test)]
pub(crate) mod test_support {
    use pcoach_models::{FaceLandmarks, HandLandmarks, Landmark, PoseLandmarks};

    pub fn pose_with(nose: (f64, f64), shoulders: ((f64, f64), (f64, f64))) -> PoseLandmarks {
        let mut points = vec![Landmark::new(0.5, 0.5); PoseLandmarks::LEN];
        points[PoseLandmarks::NOSE] = Landmark::new(nose.0, nose.1);
        points[PoseLandmarks::LEFT_SHOULDER] = Landmark::new(shoulders.0 .0, shoulders.0 .1);
        points[PoseLandmarks::RIGHT_SHOULDER] = Landmark::new(shoulders.1 .0, shoulders.1 .1);
        PoseLandmarks::new(points)
    }

    pub fn face_with(left_eye_x: f64, right_eye_x: f64) -> FaceLandmarks {
        let mut points = vec![Landmark::new(0.5, 0.5); FaceLandmarks::LEN];
        points[FaceLandmarks::LEFT_EYE] = Landmark::new(left_eye_x, 0.4);
        points[FaceLandmarks::RIGHT_EYE] = Landmark::new(right_eye_x, 0.4);
        FaceLandmarks::new(points)
    }

    pub fn hand_with(wrist: (f64, f64), thumb: (f64, f64), index: (f64, f64)) -> HandLandmarks {
        let mut points = vec![Landmark::new(wrist.0, wrist.1); HandLandmarks::LEN];
        points[HandLandmarks::THUMB_TIP] = Landmark::new(thumb.0, thumb.1);
        points[HandLandmarks::INDEX_FINGER_TIP] = Landmark::new(index.0, index.1);
        HandLandmarks::new(points)
    }
}

//! Head position (posture) score.

use pcoach_models::{round2, PoseLandmarks};

/// Horizontal tolerance as a fraction of frame width.
const MAX_X_FRACTION: f64 = 0.1;
/// Vertical tolerance as a fraction of frame height.
const MAX_Y_FRACTION: f64 = 0.2;

/// How far the nose sits from the frame center.
///
/// Each axis is normalized against its tolerance and capped at 1; the score
/// is the mean of both axes. No pose (or no nose point) scores 0.
pub fn head_position_score(pose: Option<&PoseLandmarks>, width: u32, height: u32) -> f64 {
    let Some(nose) = pose.and_then(PoseLandmarks::nose) else {
        return 0.0;
    };
    if width == 0 || height == 0 {
        return 0.0;
    }

    let (w, h) = (width as f64, height as f64);
    let x_distance = (nose.x * w - w / 2.0).abs();
    let y_distance = (nose.y * h - h / 2.0).abs();

    let x_score = (x_distance / (w * MAX_X_FRACTION)).min(1.0);
    let y_score = (y_distance / (h * MAX_Y_FRACTION)).min(1.0);

    round2((x_score + y_score) / 2.0)
}

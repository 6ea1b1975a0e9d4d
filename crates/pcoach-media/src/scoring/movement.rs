//! Sudden body movement score.

use pcoach_models::{round2, PoseLandmarks};

use super::UNKNOWN_MOTION_SCORE;

/// Shoulder displacement (normalized units) that saturates the score.
pub const MOVEMENT_THRESHOLD: f64 = 0.1;

/// Shoulder-midpoint displacement between the previous and current pose.
///
/// Without a previous pose the motion is unknown and scores
/// [`UNKNOWN_MOTION_SCORE`].
pub fn sudden_movement_score(current: &PoseLandmarks, previous: Option<&PoseLandmarks>) -> f64 {
    let Some(previous) = previous else {
        return UNKNOWN_MOTION_SCORE;
    };
    let (Some(now), Some(before)) = (current.shoulder_center(), previous.shoulder_center()) else {
        return UNKNOWN_MOTION_SCORE;
    };

    round2((now.distance(&before) / MOVEMENT_THRESHOLD).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::pose_with;

    #[test]
    fn test_no_previous_pose_is_unknown() {
        let pose = pose_with((0.5, 0.5), ((0.4, 0.6), (0.6, 0.6)));
        assert_eq!(sudden_movement_score(&pose, None), 0.1);
    }

    #[test]
    fn test_still_speaker_scores_zero() {
        let pose = pose_with((0.5, 0.5), ((0.4, 0.6), (0.6, 0.6)));
        assert_eq!(sudden_movement_score(&pose, Some(&pose.clone())), 0.0);
    }

    #[test]
    fn test_displacement_is_normalized() {
        let before = pose_with((0.5, 0.5), ((0.4, 0.6), (0.6, 0.6)));
        let after = pose_with((0.5, 0.5), ((0.43, 0.6), (0.63, 0.6)));
        assert_eq!(sudden_movement_score(&after, Some(&before)), 0.3);
    }

    #[test]
    fn test_large_displacement_clamps() {
        let before = pose_with((0.5, 0.5), ((0.1, 0.6), (0.3, 0.6)));
        let after = pose_with((0.5, 0.5), ((0.7, 0.6), (0.9, 0.6)));
        assert_eq!(sudden_movement_score(&after, Some(&before)), 1.0);
    }
}

//! Hand gesture scores and their aggregate.

use pcoach_models::{round2, HandLandmarks};

use super::{INSUFFICIENT_GESTURE_SIGNAL, UNKNOWN_MOTION_SCORE};

/// Thumb-to-index distance that saturates the excessive-gesture score.
pub const GESTURE_DISTANCE_THRESHOLD: f64 = 0.2;
/// Wrist displacement that saturates the hand-movement score.
pub const HAND_MOVEMENT_THRESHOLD: f64 = 0.1;

/// Spread between thumb tip and index finger tip for one hand.
pub fn excessive_gesture_score(hand: &HandLandmarks) -> f64 {
    let (Some(thumb), Some(index)) = (hand.thumb_tip(), hand.index_tip()) else {
        return 0.0;
    };
    round2((thumb.distance(index) / GESTURE_DISTANCE_THRESHOLD).min(1.0))
}

/// Wrist displacement between the previous and current hand.
///
/// Without a previous hand the motion is unknown and scores
/// [`UNKNOWN_MOTION_SCORE`].
pub fn hand_movement_score(current: &HandLandmarks, previous: Option<&HandLandmarks>) -> f64 {
    let Some(previous) = previous else {
        return UNKNOWN_MOTION_SCORE;
    };
    let (Some(now), Some(before)) = (current.wrist(), previous.wrist()) else {
        return UNKNOWN_MOTION_SCORE;
    };
    round2((now.distance(before) / HAND_MOVEMENT_THRESHOLD).min(1.0))
}

/// Mean of the excessive-gesture and hand-movement scores.
///
/// When either input is missing or not positive the result is pinned to
/// [`INSUFFICIENT_GESTURE_SIGNAL`] regardless of the other one.
pub fn gesture_aggregate(excessive: Option<f64>, movement: Option<f64>) -> f64 {
    match (excessive, movement) {
        (Some(e), Some(m)) if e > 0.0 && m > 0.0 => round2((e + m) / 2.0),
        _ => INSUFFICIENT_GESTURE_SIGNAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::hand_with;

    #[test]
    fn test_aggregate_averages_positive_inputs() {
        assert_eq!(gesture_aggregate(Some(0.6), Some(0.4)), 0.5);
    }

    #[test]
    fn test_aggregate_floor() {
        assert_eq!(gesture_aggregate(None, Some(0.4)), 0.1);
        assert_eq!(gesture_aggregate(Some(-0.1), Some(0.4)), 0.1);
        assert_eq!(gesture_aggregate(Some(0.9), Some(0.0)), 0.1);
        assert_eq!(gesture_aggregate(None, None), 0.1);
    }

    #[test]
    fn test_excessive_gesture_score() {
        // thumb and index 0.1 apart horizontally
        let hand = hand_with((0.5, 0.5), (0.5, 0.5), (0.6, 0.5));
        assert_eq!(excessive_gesture_score(&hand), 0.5);

        let wide = hand_with((0.5, 0.5), (0.1, 0.1), (0.9, 0.9));
        assert_eq!(excessive_gesture_score(&wide), 1.0);
    }

    #[test]
    fn test_hand_movement_without_previous_is_unknown() {
        let hand = hand_with((0.5, 0.5), (0.5, 0.5), (0.6, 0.5));
        assert_eq!(hand_movement_score(&hand, None), 0.1);
    }

    #[test]
    fn test_hand_movement_with_previous() {
        let before = hand_with((0.5, 0.5), (0.5, 0.5), (0.6, 0.5));
        let after = hand_with((0.5, 0.54), (0.5, 0.5), (0.6, 0.5));
        assert_eq!(hand_movement_score(&after, Some(&before)), 0.4);

        let far = hand_with((0.9, 0.9), (0.5, 0.5), (0.6, 0.5));
        assert_eq!(hand_movement_score(&far, Some(&before)), 1.0);
    }
}

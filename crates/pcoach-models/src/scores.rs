//! Geometric score vector and problematic-frame thresholds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default posture threshold (nose offset from frame center).
pub const DEFAULT_POSTURE_THRESHOLD: f64 = 0.8;
/// Default gaze threshold (eyes outside the center band).
pub const DEFAULT_GAZE_THRESHOLD: f64 = 0.7;
/// Default gesture threshold (aggregated hand score).
pub const DEFAULT_GESTURES_THRESHOLD: f64 = 0.7;
/// Default sudden-movement threshold (shoulder displacement).
pub const DEFAULT_MOVEMENT_THRESHOLD: f64 = 0.7;

/// Round to two decimal places, ties to even.
///
/// Every score goes through this before it is compared or reported.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Per-frame geometric scores, each in `[0, 1]` with two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreVector {
    pub posture: f64,
    pub gaze: f64,
    pub gestures: f64,
    pub sudden_movement: f64,
}

impl ScoreVector {
    /// Build a score vector, clamping to `[0, 1]` and rounding each field.
    pub fn new(posture: f64, gaze: f64, gestures: f64, sudden_movement: f64) -> Self {
        let norm = |v: f64| round2(v.clamp(0.0, 1.0));
        Self {
            posture: norm(posture),
            gaze: norm(gaze),
            gestures: norm(gestures),
            sudden_movement: norm(sudden_movement),
        }
    }

    /// All-zero scores, used when landmark detection fails.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether any score crosses its threshold (strictly greater).
    pub fn is_problematic(&self, thresholds: &Thresholds) -> bool {
        self.posture > thresholds.posture
            || self.gaze > thresholds.gaze
            || self.gestures > thresholds.gestures
            || self.sudden_movement > thresholds.movement
    }

    /// Render the scores keyed by the feedback section they inform.
    ///
    /// This is the per-frame summary attached to the enrichment prompt.
    pub fn section_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "gaze_processing": { "score": self.gaze },
            "gestures": { "score": self.gestures },
            "posture_body": { "score": self.posture },
            "movement": { "score": self.sudden_movement },
        })
    }
}

/// Thresholds above which a frame is considered problematic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Thresholds {
    pub posture: f64,
    pub gaze: f64,
    pub gestures: f64,
    pub movement: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            posture: DEFAULT_POSTURE_THRESHOLD,
            gaze: DEFAULT_GAZE_THRESHOLD,
            gestures: DEFAULT_GESTURES_THRESHOLD,
            movement: DEFAULT_MOVEMENT_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.456), 0.46);
        assert_eq!(round2(0.454), 0.45);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_score_vector_clamps_and_rounds() {
        let scores = ScoreVector::new(1.7, -0.2, 0.333, 0.999);
        assert_eq!(scores.posture, 1.0);
        assert_eq!(scores.gaze, 0.0);
        assert_eq!(scores.gestures, 0.33);
        assert_eq!(scores.sudden_movement, 1.0);
    }

    #[test]
    fn test_posture_threshold_is_strict() {
        let thresholds = Thresholds::default();
        assert!(!ScoreVector::new(0.8, 0.0, 0.0, 0.0).is_problematic(&thresholds));
        assert!(ScoreVector::new(0.81, 0.0, 0.0, 0.0).is_problematic(&thresholds));
    }

    #[test]
    fn test_any_signal_marks_problematic() {
        let thresholds = Thresholds::default();
        assert!(ScoreVector::new(0.0, 0.71, 0.0, 0.0).is_problematic(&thresholds));
        assert!(ScoreVector::new(0.0, 0.0, 0.75, 0.0).is_problematic(&thresholds));
        assert!(ScoreVector::new(0.0, 0.0, 0.0, 0.9).is_problematic(&thresholds));
        assert!(!ScoreVector::new(0.5, 0.7, 0.7, 0.7).is_problematic(&thresholds));
    }

    #[test]
    fn test_section_summary_keys() {
        let summary = ScoreVector::new(0.9, 0.1, 0.2, 0.3).section_summary();
        assert_eq!(summary["posture_body"]["score"], 0.9);
        assert_eq!(summary["gaze_processing"]["score"], 0.1);
        assert_eq!(summary["gestures"]["score"], 0.2);
        assert_eq!(summary["movement"]["score"], 0.3);
    }
}

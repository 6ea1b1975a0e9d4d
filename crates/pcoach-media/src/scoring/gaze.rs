//! Eye contact (gaze) score.

use pcoach_models::{round2, FaceLandmarks};

/// Left edge of the center band, as a fraction of frame width.
const BAND_MIN: f64 = 0.4;
/// Right edge of the center band.
const BAND_MAX: f64 = 0.6;
/// Normalized deviation that saturates the score.
const SENSITIVITY: f64 = 0.1;

/// Horizontal distance of `x` outside `[min, max]`, or 0 inside.
fn band_deviation(x: f64, min: f64, max: f64) -> f64 {
    (min - x).max(x - max).max(0.0)
}

/// How far both eyes sit outside the horizontal center band.
///
/// Deviations of both eyes are summed, normalized by frame width and by the
/// sensitivity constant, then capped at 1. No face scores 0.
pub fn lack_of_eye_contact_score(face: Option<&FaceLandmarks>, width: u32) -> f64 {
    let Some(face) = face else {
        return 0.0;
    };
    let (Some(left), Some(right)) = (face.left_eye(), face.right_eye()) else {
        return 0.0;
    };
    if width == 0 {
        return 0.0;
    }

    let w = width as f64;
    let (min, max) = (BAND_MIN * w, BAND_MAX * w);
    let deviation = band_deviation(left.x * w, min, max) + band_deviation(right.x * w, min, max);

    round2((deviation / w / SENSITIVITY).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::test_support::face_with;

    #[test]
    fn test_eyes_inside_band_score_zero() {
        let face = face_with(0.45, 0.55);
        assert_eq!(lack_of_eye_contact_score(Some(&face), 640), 0.0);
    }

    #[test]
    fn test_small_deviation() {
        // left eye 0.05w left of the band, right eye inside
        let face = face_with(0.35, 0.5);
        assert_eq!(lack_of_eye_contact_score(Some(&face), 1000), 0.5);
    }

    #[test]
    fn test_deviation_sums_both_eyes_and_clamps() {
        let face = face_with(0.1, 0.9);
        assert_eq!(lack_of_eye_contact_score(Some(&face), 640), 1.0);
    }

    #[test]
    fn test_no_face_scores_zero() {
        assert_eq!(lack_of_eye_contact_score(None, 640), 0.0);
    }

    #[test]
    fn test_band_deviation() {
        assert_eq!(band_deviation(5.0, 4.0, 6.0), 0.0);
        assert_eq!(band_deviation(3.0, 4.0, 6.0), 1.0);
        assert_eq!(band_deviation(8.0, 4.0, 6.0), 2.0);
    }
}

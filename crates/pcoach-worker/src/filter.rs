//! Segment filter: geometric pre-screen over one segment's frames.

use std::sync::Arc;

use pcoach_media::{analyze_frame, Frame, LandmarkDetector, LandmarkState};
use pcoach_models::{ScoreVector, Thresholds};
use tracing::debug;

use crate::metrics::record_problematic_frame;

/// A sampled frame whose scores crossed a threshold.
#[derive(Debug, Clone)]
pub struct ProblematicFrame {
    pub frame: Frame,
    /// Segment ordinal (0-based)
    pub segment: u32,
    /// Frame ordinal within the segment (0-based)
    pub frame_index: u32,
    /// Absolute position in the video, in seconds
    pub timestamp_secs: f64,
    pub scores: ScoreVector,
}

/// Scores every frame of a segment and keeps the problematic ones.
#[derive(Clone)]
pub struct SegmentFilter {
    detector: Arc<dyn LandmarkDetector>,
    thresholds: Thresholds,
}

impl SegmentFilter {
    pub fn new(detector: Arc<dyn LandmarkDetector>, thresholds: Thresholds) -> Self {
        Self {
            detector,
            thresholds,
        }
    }

    /// Score frames in order and return the problematic ones, in order.
    ///
    /// Landmark state starts empty for every segment and is dropped when the
    /// segment is done.
    pub async fn filter(
        &self,
        frames: Vec<Frame>,
        segment: u32,
        segment_start_secs: f64,
        interval_secs: f64,
    ) -> Vec<ProblematicFrame> {
        let mut state = LandmarkState::new();
        let mut problematic = Vec::new();

        for (idx, frame) in frames.into_iter().enumerate() {
            let (scores, next_state) = analyze_frame(self.detector.as_ref(), &frame, state).await;
            state = next_state;

            if !scores.is_problematic(&self.thresholds) {
                continue;
            }

            let timestamp_secs = segment_start_secs + idx as f64 * interval_secs;
            debug!(
                segment,
                frame = idx,
                timestamp = timestamp_secs,
                posture = scores.posture,
                gaze = scores.gaze,
                gestures = scores.gestures,
                sudden_movement = scores.sudden_movement,
                "Problematic frame"
            );
            record_problematic_frame();

            problematic.push(ProblematicFrame {
                frame,
                segment,
                frame_index: idx as u32,
                timestamp_secs,
                scores,
            });
        }

        problematic
    }
}

//! Feedback schema produced by the vision model and returned to callers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Section keys of the feedback schema, in display order.
pub const SECTION_KEYS: [&str; 5] = [
    "gaze_processing",
    "facial_expression",
    "gestures",
    "posture_body",
    "movement",
];

/// One feedback section. An empty `improvement` means "no issue".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackDetails {
    pub improvement: String,
    pub recommendations: String,
}

impl FeedbackDetails {
    pub fn new(improvement: impl Into<String>, recommendations: impl Into<String>) -> Self {
        Self {
            improvement: improvement.into(),
            recommendations: recommendations.into(),
        }
    }

    pub fn has_improvement(&self) -> bool {
        !self.improvement.is_empty()
    }
}

/// The five fixed feedback sections. All are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackSections {
    pub gaze_processing: FeedbackDetails,
    pub facial_expression: FeedbackDetails,
    pub gestures: FeedbackDetails,
    pub posture_body: FeedbackDetails,
    pub movement: FeedbackDetails,
}

impl FeedbackSections {
    /// All sections empty (the model reported no problem).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a section by its schema key.
    pub fn section(&self, key: &str) -> Option<&FeedbackDetails> {
        match key {
            "gaze_processing" => Some(&self.gaze_processing),
            "facial_expression" => Some(&self.facial_expression),
            "gestures" => Some(&self.gestures),
            "posture_body" => Some(&self.posture_body),
            "movement" => Some(&self.movement),
            _ => None,
        }
    }

    /// Mutable lookup by schema key.
    pub fn section_mut(&mut self, key: &str) -> Option<&mut FeedbackDetails> {
        match key {
            "gaze_processing" => Some(&mut self.gaze_processing),
            "facial_expression" => Some(&mut self.facial_expression),
            "gestures" => Some(&mut self.gestures),
            "posture_body" => Some(&mut self.posture_body),
            "movement" => Some(&mut self.movement),
            _ => None,
        }
    }

    /// Keys of sections with non-empty improvement text.
    pub fn detected_sections(&self) -> Vec<&'static str> {
        SECTION_KEYS
            .iter()
            .copied()
            .filter(|key| self.section(key).is_some_and(FeedbackDetails::has_improvement))
            .collect()
    }

    /// At least one section carries improvement text.
    pub fn problem_detected(&self) -> bool {
        !self.detected_sections().is_empty()
    }
}

/// One feedback entry for a problematic frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackRecord {
    pub video_id: String,
    /// Frame ordinal within its segment
    pub frame_index: u32,
    /// Human-readable timestamp, e.g. `"1m 5s"`
    pub timestamp: String,
    #[serde(rename = "feedback_text")]
    pub sections: FeedbackSections,
    pub image_base64: String,
}

/// Problem indicator attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Problem {
    /// Analysis finished and nothing needed feedback.
    #[serde(rename = "none")]
    NoFeedback,
}

/// Final result of processing one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackReport {
    pub feedbacks: Vec<FeedbackRecord>,
    pub message: String,
    pub problem: Option<Problem>,
}

impl FeedbackReport {
    /// Build a report, flagging `Problem::NoFeedback` when there are no records.
    pub fn from_records(feedbacks: Vec<FeedbackRecord>) -> Self {
        if feedbacks.is_empty() {
            Self {
                feedbacks,
                message: "No feedback needed for this video".to_string(),
                problem: Some(Problem::NoFeedback),
            }
        } else {
            Self {
                message: format!("Generated {} feedback entries", feedbacks.len()),
                feedbacks,
                problem: None,
            }
        }
    }
}

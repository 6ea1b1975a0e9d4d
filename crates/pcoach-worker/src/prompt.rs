//! Prompt assembly for the vision model.

use std::path::Path;

use pcoach_models::{FeedbackSections, ScoreVector};
use schemars::schema_for;

use crate::error::{WorkerError, WorkerResult};

/// System message sent with every enrichment request.
pub const SYSTEM_INSTRUCTION: &str = "You are a presentation coach reviewing a single still \
frame of a speaker. Judge only non-verbal delivery: eye contact, facial expression, hand \
gestures, posture and body movement. Be concrete and kind. Answer with a single JSON object \
and nothing else.";

/// User prompt used when no template file is configured.
pub const DEFAULT_USER_PROMPT: &str = "An automatic pre-screen flagged this frame as a \
possible non-verbal delivery problem. Look at the attached image and decide whether the \
speaker actually shows a problem.

For each section, set `improvement` to a short description of what the speaker should \
change, and `recommendations` to one or two practical tips. Leave both empty for sections \
without a problem.

If the frame shows no problem at all, answer exactly {\"problem\": \"none\"}.";

/// User prompt template plus the fixed output contract.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    user_prompt: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            user_prompt: DEFAULT_USER_PROMPT.to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
        }
    }

    /// Load the user prompt from a file, or fall back to the built-in one.
    pub async fn load(path: Option<&Path>) -> WorkerResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let user_prompt = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WorkerError::prompt(format!("{}: {}", path.display(), e)))?;

        if user_prompt.trim().is_empty() {
            return Err(WorkerError::prompt(format!(
                "{}: prompt file is empty",
                path.display()
            )));
        }

        Ok(Self::new(user_prompt))
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }

    /// Render the text part of the request for one frame.
    pub fn render(&self, scores: &ScoreVector) -> WorkerResult<String> {
        let summary = serde_json::to_string_pretty(&scores.section_summary())
            .map_err(|e| WorkerError::prompt(format!("score summary: {e}")))?;
        let schema = serde_json::to_string_pretty(&schema_for!(FeedbackSections))
            .map_err(|e| WorkerError::prompt(format!("output schema: {e}")))?;

        Ok(format!(
            r#"{user_prompt}

Geometric pre-screen scores for this frame (0 = fine, 1 = severe):
{summary}

Return ONLY a single JSON object matching this schema:
{schema}"#,
            user_prompt = self.user_prompt.trim_end(),
        ))
    }
}

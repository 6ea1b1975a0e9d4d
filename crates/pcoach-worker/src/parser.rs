//! Feedback parser.
//!
//! Turns the model's free-form answer into the fixed five-section schema.
//! All five sections are always present in the result; a section the model
//! left out comes back with empty strings.

use pcoach_models::{FeedbackDetails, FeedbackSections, SECTION_KEYS};
use serde_json::{Map, Value};

use crate::error::{WorkerError, WorkerResult};

/// Strip a surrounding markdown code fence (```json ... ``` or ``` ... ```).
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

fn text_field(section: &Map<String, Value>, key: &str, field: &str) -> WorkerResult<String> {
    match section.get(field) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(WorkerError::feedback_construction(format!(
            "{key}.{field} must be a string, got {other}"
        ))),
    }
}

/// Parse model output into [`FeedbackSections`].
///
/// Invalid JSON (or an empty answer) is a [`WorkerError::Parse`]; valid JSON
/// of the wrong shape is a [`WorkerError::FeedbackConstruction`].
pub fn parse_feedback_text(text: &str) -> WorkerResult<FeedbackSections> {
    if text.trim().is_empty() {
        return Err(WorkerError::parse("empty feedback text"));
    }

    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| WorkerError::parse(format!("invalid feedback JSON: {e}")))?;

    let Value::Object(root) = value else {
        return Err(WorkerError::feedback_construction(
            "feedback must be a JSON object",
        ));
    };

    if root.get("problem").and_then(Value::as_str) == Some("none") {
        return Ok(FeedbackSections::empty());
    }

    let mut sections = FeedbackSections::empty();
    for key in SECTION_KEYS {
        let section = match root.get(key) {
            None => continue,
            Some(Value::Object(section)) => section,
            Some(other) => {
                return Err(WorkerError::feedback_construction(format!(
                    "section {key} must be an object, got {other}"
                )))
            }
        };

        let details = FeedbackDetails::new(
            text_field(section, key, "improvement")?,
            text_field(section, key, "recommendations")?,
        );
        if let Some(slot) = sections.section_mut(key) {
            *slot = details;
        }
    }

    Ok(sections)
}

//! Pipeline metrics.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const PROBLEMATIC_FRAMES_TOTAL: &str = "pcoach_problematic_frames_total";
    pub const ENRICHMENT_CALLS_TOTAL: &str = "pcoach_enrichment_calls_total";
    pub const ENRICHMENT_DURATION_SECONDS: &str = "pcoach_enrichment_duration_seconds";
    pub const FEEDBACK_RECORDS_TOTAL: &str = "pcoach_feedback_records_total";
}

pub fn record_problematic_frame() {
    counter!(names::PROBLEMATIC_FRAMES_TOTAL).increment(1);
}

/// Record one model round trip and whether it succeeded.
pub fn record_enrichment_call(model: &str, success: bool, duration_secs: f64) {
    let labels = [
        ("model", model.to_string()),
        ("status", if success { "ok" } else { "error" }.to_string()),
    ];
    counter!(names::ENRICHMENT_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::ENRICHMENT_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_feedback_record() {
    counter!(names::FEEDBACK_RECORDS_TOTAL).increment(1);
}

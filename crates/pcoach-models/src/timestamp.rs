//! Timestamp formatting for feedback records and artifact names.

/// Format seconds as `"<minutes>m <seconds>s"`, truncating fractions.
///
/// # Examples
/// ```
/// use pcoach_models::timestamp::format_timestamp;
/// assert_eq!(format_timestamp(65.0), "1m 5s");
/// assert_eq!(format_timestamp(0.0), "0m 0s");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}m {}s", minutes, secs)
}

/// Turn a display timestamp into a file-name-safe token.
///
/// `"1m 5s"` becomes `"1m_5s"`; anything outside `[A-Za-z0-9_]` is dropped.
pub fn safe_timestamp(timestamp: &str) -> String {
    let spaced = timestamp
        .replace("m ", "m_")
        .replace(' ', "_")
        .replace('s', "s_");
    spaced
        .trim_matches('_')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

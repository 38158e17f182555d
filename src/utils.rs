//! Small string helpers shared by the extractors and the presentation layer.
//!
//! - Character-safe truncation for log previews and summaries
//! - Whitespace collapsing for text pulled out of HTML

/// Marker appended to text cut short by [`truncate_with_marker`].
pub const TRUNCATION_MARKER: &str = "...";

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// First `max_chars` characters of `s`, followed by [`TRUNCATION_MARKER`]
/// when anything was cut.
pub fn truncate_with_marker(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}{}", s[..cut].trim_end(), TRUNCATION_MARKER),
    }
}

/// Replace every run of whitespace with a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

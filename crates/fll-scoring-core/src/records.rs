//! Helpers for the line-oriented records output format

/// Escape double quotes for records output
pub fn escape_quotes(s: &str) -> String {
    s.replace('\"', r#"\""#)
}

/// A value as it appears in a records line: quoted when it contains spaces
/// or quotes, bare otherwise
pub fn record_value(s: &str) -> String {
    if s.is_empty() || s.contains(char::is_whitespace) || s.contains('"') {
        format!("\"{}\"", escape_quotes(s))
    } else {
        s.to_string()
    }
}

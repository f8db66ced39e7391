//! Plain-text helpers shared by both renderers.

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Collapses every whitespace run to a single space and trims both ends.
///
/// # Examples
///
/// ```
/// use citenote::normalize_text;
///
/// assert_eq!(normalize_text("  A\n\n  B   C "), "A B C");
/// ```
pub fn normalize_text(value: &str) -> String {
    whitespace_run().replace_all(value, " ").trim().to_string()
}

/// Escapes `&`, `"`, `<` and `>` for use inside a double-quoted attribute.
///
/// Nothing else is touched; apostrophes in particular pass through.
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes `&`, `<` and `>` in character data.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

//! Stylesheet handling.
//!
//! Provides the built-in stylesheets of both renderers, loading of custom
//! stylesheets from disk, and idempotent injection into a document head.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::dom::Document;

/// Errors that can occur when loading styles.
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Loads a CSS stylesheet from a file.
///
/// # Arguments
///
/// * `path` - Path to the .css file
///
/// # Returns
///
/// The CSS content as a string.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_style(path: &Path) -> Result<String, StyleError> {
    let content = fs::read_to_string(path)?;
    Ok(content)
}

/// Single source of truth for builtin styles: (name, generator taking the
/// container id).
const BUILTIN_STYLES: &[(&str, fn(&str) -> String)] = &[
    ("bibliography", bibliography_style),
    ("footnote", footnote_style),
];

/// Returns a built-in stylesheet by name, scoped to `container_id`.
///
/// # Examples
///
/// ```
/// use citenote::builtin_style;
///
/// let css = builtin_style("footnote", "notes").unwrap();
/// assert!(css.starts_with("#notes div"));
/// assert!(builtin_style("apa", "refs").is_none());
/// ```
pub fn builtin_style(name: &str, container_id: &str) -> Option<String> {
    BUILTIN_STYLES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, generate)| generate(container_id))
}

/// Returns the list of available builtin style names.
pub fn builtin_style_names() -> Vec<&'static str> {
    BUILTIN_STYLES.iter().map(|(n, _)| *n).collect()
}

/// Numbered list rendered as a two-column table: `[n]` then the entry text.
pub fn bibliography_style(container_id: &str) -> String {
    [
        format!("#{container_id} ol li {{ list-style: none; }}"),
        format!("#{container_id} ol {{ counter-reset: list; padding: 0; margin: 0; }}"),
        format!(
            "#{container_id} ol > li {{ display: table; counter-increment: list; margin-bottom: 0.6em; }}"
        ),
        format!(
            "#{container_id} ol > li:before {{ content: \"[\" counter(list, decimal) \"] \"; display: table-cell; padding-right: .6em; }}"
        ),
    ]
    .join("\n")
}

/// Hanging indent so the footnote marker sticks out to the left.
pub fn footnote_style(container_id: &str) -> String {
    format!("#{container_id} div {{ margin-bottom: 0.6em; margin-left: 1em; text-indent: -1em; }}")
}

/// Appends `<style id="{id}">{css}</style>` to the document head unless a
/// `style#{id}` element already exists anywhere in the document.
///
/// Returns `true` when a stylesheet was inserted. A document without a head
/// is left untouched.
pub fn inject_style(doc: &mut Document, id: &str, css: &str) -> bool {
    let present = doc
        .find_element(|e| e.local_name() == "style" && e.attr("id") == Some(id))
        .is_some();
    if present {
        return false;
    }
    let Some(head) = doc.head() else {
        tracing::debug!(style_id = id, "document has no head, stylesheet not injected");
        return false;
    };
    let style = doc.create_element("style", &[("id", id)]);
    let text = doc.create_text(css);
    doc.append_child(style, text);
    doc.append_child(head, style);
    true
}

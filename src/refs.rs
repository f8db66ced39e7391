//! Reference entry collection.
//!
//! Reference entries are declared inline in the document, e.g.
//! `<p data-bib-key="knuth84">Knuth, D. E. <i>Literate Programming</i>.</p>`.
//! Collection reads their plain text and removes them from the tree.

use std::collections::HashMap;

use crate::dom::Document;
use crate::text::normalize_text;

/// The authoritative text for one bibliography key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub key: String,
    /// Text content with child markup dropped and whitespace normalized.
    pub text: String,
}

/// Reference entries collected from a document, keyed by reference key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    entries: HashMap<String, ReferenceEntry>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an entry, replacing any previous entry with the same key.
    pub fn insert(&mut self, entry: ReferenceEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&ReferenceEntry> {
        self.entries.get(key)
    }

    /// Text of `key`, or `""` when it was never declared.
    pub fn text(&self, key: &str) -> &str {
        self.get(key).map_or("", |e| e.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects every element carrying `key_attribute` and removes it.
///
/// Elements whose trimmed key is empty are skipped and stay in the tree.
/// When a key is declared more than once, the last declaration in document
/// order wins.
///
/// # Arguments
///
/// * `doc` - The document to scan; declaring elements are detached from it
/// * `key_attribute` - Attribute holding the reference key (`data-bib-key`)
///
/// # Returns
///
/// The collected references.
pub fn collect_references(doc: &mut Document, key_attribute: &str) -> References {
    let mut references = References::new();

    for node in doc.elements_with_attr(key_attribute) {
        let key = doc.attr(node, key_attribute).unwrap_or_default().trim();
        if key.is_empty() {
            continue;
        }
        let entry = ReferenceEntry {
            key: key.to_string(),
            text: normalize_text(&doc.text_content(node)),
        };
        tracing::trace!(key = %entry.key, "collected reference entry");
        references.insert(entry);
        doc.detach(node);
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::to_html;

    #[test]
    fn test_collect_normalizes_and_strips_markup() {
        // Given: a reference entry with nested markup and messy whitespace
        let mut doc = Document::parse(
            "<p data-bib-key=\"knuth\">  Knuth,\n\n  D. E.   <i>Literate\tProgramming</i> </p>",
        );

        // When: we collect references
        let refs = collect_references(&mut doc, "data-bib-key");

        // Then: only normalized text is retained
        assert_eq!(refs.text("knuth"), "Knuth, D. E. Literate Programming");
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_collect_spec_normalization_example() {
        let mut doc = Document::parse("<p data-bib-key=\"a\">  A\n\n  B   C </p>");
        let refs = collect_references(&mut doc, "data-bib-key");
        assert_eq!(refs.text("a"), "A B C");
    }

    #[test]
    fn test_collect_removes_declaring_elements() {
        let mut doc = Document::parse(
            r#"<p>keep</p><p data-bib-key="a">A</p><div data-bib-key="b">B</div>"#,
        );

        collect_references(&mut doc, "data-bib-key");

        let html = to_html(&doc);
        assert!(html.contains("<p>keep</p>"));
        assert!(!html.contains("data-bib-key"));
    }

    #[test]
    fn test_collect_trims_key() {
        let mut doc = Document::parse(r#"<p data-bib-key="  a  ">A</p>"#);
        let refs = collect_references(&mut doc, "data-bib-key");
        assert_eq!(refs.get("a").unwrap().key, "a");
    }

    #[test]
    fn test_collect_skips_and_keeps_empty_keys() {
        // Given: entries with empty and blank keys
        let mut doc = Document::parse(
            r#"<p data-bib-key="">empty</p><p data-bib-key="   ">blank</p>"#,
        );

        // When: we collect references
        let refs = collect_references(&mut doc, "data-bib-key");

        // Then: nothing is collected and both elements stay
        assert!(refs.is_empty());
        assert_eq!(doc.elements_with_attr("data-bib-key").len(), 2);
    }

    #[test]
    fn test_collect_duplicate_key_last_wins() {
        let mut doc = Document::parse(
            r#"<p data-bib-key="a">first</p><p data-bib-key="a">second</p>"#,
        );

        let refs = collect_references(&mut doc, "data-bib-key");

        assert_eq!(refs.text("a"), "second");
        assert_eq!(refs.len(), 1);
        assert!(doc.elements_with_attr("data-bib-key").is_empty());
    }

    #[test]
    fn test_text_of_undeclared_key_is_empty() {
        assert_eq!(References::new().text("missing"), "");
    }
}

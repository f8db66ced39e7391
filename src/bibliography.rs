//! Numbered bibliography rendering.
//!
//! Citation markers (`<span data-cite="key">`) are numbered by first
//! appearance, a numbered list is written into the bibliography container and
//! each marker becomes `<sup>[<a href="#bib-key" title="...">n</a>]</sup>`.

use indexmap::IndexMap;

use crate::config::BibliographyConfig;
use crate::dom::{Document, NodeId};
use crate::processor::Render;
use crate::refs::collect_references;
use crate::style::{bibliography_style, inject_style};

/// First-seen ranking of citation keys.
///
/// Ranks form the dense sequence `1..=len()` in the order keys were first
/// assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationIndex {
    ranks: IndexMap<String, usize>,
}

impl CitationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rank of `key`, assigning the next one if it is new.
    ///
    /// The flag is `true` when the rank was assigned by this call.
    ///
    /// # Examples
    ///
    /// ```
    /// use citenote::CitationIndex;
    ///
    /// let mut index = CitationIndex::new();
    /// assert_eq!(index.assign("b"), (1, true));
    /// assert_eq!(index.assign("a"), (2, true));
    /// assert_eq!(index.assign("b"), (1, false));
    /// ```
    pub fn assign(&mut self, key: &str) -> (usize, bool) {
        if let Some(&rank) = self.ranks.get(key) {
            return (rank, false);
        }
        let rank = self.ranks.len() + 1;
        self.ranks.insert(key.to_string(), rank);
        (rank, true)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Renders the bibliography list and the inline citation links.
#[derive(Debug, Clone, Default)]
pub struct BibliographyRenderer {
    config: BibliographyConfig,
}

impl BibliographyRenderer {
    pub fn new(config: BibliographyConfig) -> Self {
        BibliographyRenderer { config }
    }

    fn stylesheet(&self) -> String {
        self.config
            .stylesheet
            .clone()
            .unwrap_or_else(|| bibliography_style(&self.config.container_id))
    }

    fn entry_id(&self, key: &str) -> String {
        format!("{}{}", self.config.entry_prefix, key)
    }

    /// `<sup>[<a href="#target" title="title">rank</a>]</sup>`
    fn citation_anchor(doc: &mut Document, rank: usize, target_id: &str, title: &str) -> NodeId {
        let sup = doc.create_element("sup", &[]);
        let href = format!("#{target_id}");
        let anchor = doc.create_element("a", &[("href", href.as_str()), ("title", title)]);
        let open = doc.create_text("[");
        let label = doc.create_text(&rank.to_string());
        let close = doc.create_text("]");
        doc.append_child(anchor, label);
        doc.append_child(sup, open);
        doc.append_child(sup, anchor);
        doc.append_child(sup, close);
        sup
    }
}

impl Render for BibliographyRenderer {
    fn render(&self, doc: &mut Document) {
        let config = &self.config;
        inject_style(doc, &config.style_id, &self.stylesheet());

        let references = collect_references(doc, &config.key_attribute);

        let Some(container) = doc.element_by_id(&config.container_id) else {
            tracing::debug!(
                container_id = %config.container_id,
                "bibliography container not found, skipping"
            );
            return;
        };

        doc.clear_children(container);
        let list = doc.create_element("ol", &[]);
        doc.append_child(container, list);

        let mut index = CitationIndex::new();
        let mut markers = 0usize;
        for marker in doc.elements_with_attr(&config.cite_attribute) {
            let key = doc
                .attr(marker, &config.cite_attribute)
                .unwrap_or_default()
                .trim()
                .to_string();
            if key.is_empty() {
                continue;
            }

            let target_id = self.entry_id(&key);
            let text = references.text(&key);
            let (rank, is_new) = index.assign(&key);
            if is_new {
                let item = doc.create_element("li", &[("id", target_id.as_str())]);
                if !text.is_empty() {
                    let content = doc.create_text(text);
                    doc.append_child(item, content);
                }
                doc.append_child(list, item);
            }

            let anchor = Self::citation_anchor(doc, rank, &target_id, text);
            doc.replace_with(marker, anchor);
            markers += 1;
            tracing::trace!(%key, rank, "rendered citation");
        }

        tracing::debug!(
            references = references.len(),
            cited = index.len(),
            markers,
            "bibliography rendered"
        );
    }
}

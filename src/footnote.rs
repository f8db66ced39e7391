//! Footnote rendering.
//!
//! Every `<span data-footnote>` marker is moved into the footnote container as
//! `<div id="fn-content-n">` and replaced by a superscript `†n` link. Markers
//! are numbered by position; identical footnotes are not merged.

use crate::config::FootnoteConfig;
use crate::dom::{Document, NodeId};
use crate::processor::Render;
use crate::style::{footnote_style, inject_style};
use crate::text::normalize_text;

/// Renders the footnote list and the inline footnote anchors.
#[derive(Debug, Clone, Default)]
pub struct FootnoteRenderer {
    config: FootnoteConfig,
}

impl FootnoteRenderer {
    pub fn new(config: FootnoteConfig) -> Self {
        FootnoteRenderer { config }
    }

    fn stylesheet(&self) -> String {
        self.config
            .stylesheet
            .clone()
            .unwrap_or_else(|| footnote_style(&self.config.container_id))
    }

    fn label(&self, number: usize) -> String {
        format!("{}{}", self.config.glyph, number)
    }

    /// `<div id="content"><sup><a href="#anchor">†n</a></sup> {body}</div>`
    fn entry(&self, doc: &mut Document, marker: NodeId, number: usize, ids: &FootnoteIds) -> NodeId {
        let block = doc.create_element("div", &[("id", ids.content.as_str())]);
        let sup = doc.create_element("sup", &[]);
        let href = format!("#{}", ids.anchor);
        let back_link = doc.create_element("a", &[("href", href.as_str())]);
        let label = doc.create_text(&self.label(number));
        let gap = doc.create_text(" ");
        doc.append_child(back_link, label);
        doc.append_child(sup, back_link);
        doc.append_child(block, sup);
        doc.append_child(block, gap);
        doc.copy_children_into(marker, block);
        block
    }

    /// `<sup><a id="anchor" href="#content" title="title">†n</a></sup>`
    fn anchor(&self, doc: &mut Document, number: usize, ids: &FootnoteIds, title: &str) -> NodeId {
        let sup = doc.create_element("sup", &[]);
        let href = format!("#{}", ids.content);
        let anchor = doc.create_element(
            "a",
            &[
                ("id", ids.anchor.as_str()),
                ("href", href.as_str()),
                ("title", title),
            ],
        );
        let label = doc.create_text(&self.label(number));
        doc.append_child(anchor, label);
        doc.append_child(sup, anchor);
        sup
    }
}

/// Element ids of one footnote; the two prefixes differ, so they never clash.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FootnoteIds {
    content: String,
    anchor: String,
}

impl FootnoteIds {
    fn new(config: &FootnoteConfig, number: usize) -> Self {
        FootnoteIds {
            content: format!("{}{}", config.content_prefix, number),
            anchor: format!("{}{}", config.anchor_prefix, number),
        }
    }
}

impl Render for FootnoteRenderer {
    fn render(&self, doc: &mut Document) {
        let config = &self.config;
        inject_style(doc, &config.style_id, &self.stylesheet());

        let Some(container) = doc.element_by_id(&config.container_id) else {
            tracing::debug!(
                container_id = %config.container_id,
                "footnote container not found, skipping"
            );
            return;
        };

        // Snapshot before clearing: markers inside the container still count.
        let markers = doc.elements_with_attr(&config.marker_attribute);
        doc.clear_children(container);

        for (i, marker) in markers.iter().copied().enumerate() {
            let number = i + 1;
            let ids = FootnoteIds::new(config, number);
            let title = normalize_text(&doc.text_content(marker));

            let entry = self.entry(doc, marker, number, &ids);
            doc.append_child(container, entry);

            let anchor = self.anchor(doc, number, &ids, &title);
            if !doc.replace_with(marker, anchor) {
                tracing::trace!(number, "footnote marker is detached, not replaced");
            }
        }

        tracing::debug!(footnotes = markers.len(), "footnotes rendered");
    }
}

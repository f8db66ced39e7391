//! Document processing.
//!
//! This module wires the bibliography and footnote renderers together:
//! parse the HTML, run each enabled pass once, serialize the result.

use crate::bibliography::BibliographyRenderer;
use crate::config::Config;
use crate::dom::Document;
use crate::footnote::FootnoteRenderer;
use crate::output::to_html;

/// A run-once transformation of a document.
///
/// Rendering never fails. A missing target container makes the pass return
/// early without touching the markers.
pub trait Render {
    fn render(&self, doc: &mut Document);
}

/// What a processing run found, counted before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Citation markers with a non-empty key.
    pub citations: usize,
    pub footnotes: usize,
}

/// Runs the enabled renderers in order: bibliography, then footnotes.
pub struct Processor {
    config: Config,
    renderers: Vec<Box<dyn Render>>,
}

impl Processor {
    pub fn new(config: Config) -> Self {
        let mut renderers: Vec<Box<dyn Render>> = Vec::new();
        if config.bibliography.enabled {
            renderers.push(Box::new(BibliographyRenderer::new(
                config.bibliography.clone(),
            )));
        }
        if config.footnote.enabled {
            renderers.push(Box::new(FootnoteRenderer::new(config.footnote.clone())));
        }
        Processor { config, renderers }
    }

    /// Counts the markers the enabled passes will consume.
    pub fn survey(&self, doc: &Document) -> Summary {
        let mut summary = Summary::default();
        if self.config.bibliography.enabled {
            let attribute = &self.config.bibliography.cite_attribute;
            summary.citations = doc
                .elements_with_attr(attribute)
                .into_iter()
                .filter(|&n| doc.attr(n, attribute).map_or(false, |k| !k.trim().is_empty()))
                .count();
        }
        if self.config.footnote.enabled {
            summary.footnotes = doc
                .elements_with_attr(&self.config.footnote.marker_attribute)
                .len();
        }
        summary
    }

    /// Renders `doc` in place.
    pub fn process(&self, doc: &mut Document) -> Summary {
        let summary = self.survey(doc);
        for renderer in &self.renderers {
            renderer.render(doc);
        }
        summary
    }

    /// Parses `html`, renders it and returns the serialized document.
    pub fn process_html(&self, html: &str) -> (String, Summary) {
        let mut doc = Document::parse(html);
        let summary = self.process(&mut doc);
        (to_html(&doc), summary)
    }
}

/// Renders citations and footnotes in an HTML document.
///
/// # Arguments
///
/// * `html` - The input HTML document
/// * `config` - Ids, attribute names and enabled passes
///
/// # Returns
///
/// The rendered HTML document.
///
/// # Examples
///
/// ```
/// use citenote::{process_html, Config};
///
/// let html = r#"<p data-bib-key="k">Knuth</p><span data-cite="k"></span><div id="bibliography"></div>"#;
/// let out = process_html(html, &Config::default());
/// assert!(out.contains(r##"<sup>[<a href="#bib-k" title="Knuth">1</a>]</sup>"##));
/// assert!(out.contains(r#"<li id="bib-k">Knuth</li>"#));
/// ```
pub fn process_html(html: &str, config: &Config) -> String {
    Processor::new(config.clone()).process_html(html).0
}

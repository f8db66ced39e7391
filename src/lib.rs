//! citenote: numbered citations, bibliographies and footnotes for HTML documents.
//!
//! This library provides functionality to:
//! - Parse an HTML document into a mutable tree
//! - Collect reference entries declared with `data-bib-key`
//! - Number `data-cite` citation markers by first appearance and render a bibliography
//! - Move `data-footnote` markers into a numbered footnote list
//! - Serialize the rewritten document back to HTML

pub mod bibliography;
pub mod config;
pub mod dom;
pub mod footnote;
pub mod logging;
pub mod output;
pub mod processor;
pub mod refs;
pub mod style;
pub mod text;

pub use bibliography::{BibliographyRenderer, CitationIndex};
pub use config::{load_config, parse_config, BibliographyConfig, Config, ConfigError, FootnoteConfig};
pub use dom::{Document, NodeId};
pub use footnote::FootnoteRenderer;
pub use output::{inner_html, to_html};
pub use processor::{process_html, Processor, Render, Summary};
pub use refs::{collect_references, ReferenceEntry, References};
pub use style::{builtin_style, builtin_style_names, inject_style, load_style, StyleError};
pub use text::{escape_attribute, normalize_text};

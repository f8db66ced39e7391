//! Renderer configuration.
//!
//! Every id, attribute name and prefix the renderers rely on lives here with
//! its conventional default. A configuration file is a JSON object with
//! optional `bibliography` and `footnote` sections, e.g.
//!
//! ```json
//! { "bibliography": { "container-id": "refs" }, "footnote": { "enabled": false } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("footnote content-prefix '{content}' and anchor-prefix '{anchor}' can produce the same id")]
    PrefixCollision { content: String, anchor: String },
}

/// Top-level configuration for both rendering passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bibliography: BibliographyConfig,
    pub footnote: FootnoteConfig,
}

/// Settings for the bibliography pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BibliographyConfig {
    pub enabled: bool,
    /// Id of the element that receives the numbered list.
    pub container_id: String,
    /// Attribute declaring a reference entry, e.g. `<p data-bib-key="knuth84">`.
    pub key_attribute: String,
    /// Attribute of a citation marker, e.g. `<span data-cite="knuth84">`.
    pub cite_attribute: String,
    /// Prefix of the list entry ids (`bib-knuth84`).
    pub entry_prefix: String,
    pub style_id: String,
    /// Replaces the built-in stylesheet when set.
    pub stylesheet: Option<String>,
}

impl Default for BibliographyConfig {
    fn default() -> Self {
        BibliographyConfig {
            enabled: true,
            container_id: "bibliography".to_string(),
            key_attribute: "data-bib-key".to_string(),
            cite_attribute: "data-cite".to_string(),
            entry_prefix: "bib-".to_string(),
            style_id: "bibliography-style".to_string(),
            stylesheet: None,
        }
    }
}

/// Settings for the footnote pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FootnoteConfig {
    pub enabled: bool,
    pub container_id: String,
    /// Boolean-style attribute marking a footnote, e.g. `<span data-footnote>`.
    pub marker_attribute: String,
    pub content_prefix: String,
    pub anchor_prefix: String,
    pub style_id: String,
    /// Glyph printed before the footnote number.
    pub glyph: String,
    pub stylesheet: Option<String>,
}

impl Default for FootnoteConfig {
    fn default() -> Self {
        FootnoteConfig {
            enabled: true,
            container_id: "footnote".to_string(),
            marker_attribute: "data-footnote".to_string(),
            content_prefix: "fn-content-".to_string(),
            anchor_prefix: "fn-anchor-".to_string(),
            style_id: "footnote-style".to_string(),
            glyph: "\u{2020}".to_string(),
            stylesheet: None,
        }
    }
}

impl Config {
    /// Checks the invariants the renderers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bib = &self.bibliography;
        let notes = &self.footnote;
        let required = [
            ("bibliography.container-id", &bib.container_id),
            ("bibliography.key-attribute", &bib.key_attribute),
            ("bibliography.cite-attribute", &bib.cite_attribute),
            ("bibliography.style-id", &bib.style_id),
            ("footnote.container-id", &notes.container_id),
            ("footnote.marker-attribute", &notes.marker_attribute),
            ("footnote.style-id", &notes.style_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }
        // Ids are prefix + number, so "n" + "11" and "n1" + "1" meet.
        let (content, anchor) = (&notes.content_prefix, &notes.anchor_prefix);
        if content.starts_with(anchor.as_str()) || anchor.starts_with(content.as_str()) {
            return Err(ConfigError::PrefixCollision {
                content: content.clone(),
                anchor: anchor.clone(),
            });
        }
        Ok(())
    }
}

/// Loads and validates a configuration from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, contains
/// unknown fields, or fails [`Config::validate`].
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates a configuration from JSON text.
///
/// Blank input yields the default configuration.
pub fn parse_config(json: &str) -> Result<Config, ConfigError> {
    if json.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

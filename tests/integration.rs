//! Integration tests using TOML fixtures.
//!
//! This test harness loads test cases from TOML files in the `fixtures/` directory
//! and runs them against the citenote library.

mod common;

use std::fs;
use std::path::Path;

use serde::Deserialize;

use citenote::{parse_config, process_html, Config};

/// A test fixture loaded from a TOML file.
#[derive(Debug, Deserialize)]
struct Fixture {
    /// Name of the test case
    name: String,
    /// Input HTML document
    html: String,
    /// Configuration as JSON text (default configuration when absent)
    #[serde(default)]
    config: Option<String>,
    /// Exact expected output document
    #[serde(default)]
    expected: Option<String>,
    /// Snippets the output must contain
    #[serde(default)]
    contains: Vec<String>,
    /// Snippets the output must not contain
    #[serde(default)]
    absent: Vec<String>,
}

/// Load all fixtures from a directory.
fn load_fixtures(dir: &Path) -> Vec<(String, Fixture)> {
    let mut fixtures = Vec::new();

    if !dir.exists() {
        return fixtures;
    }

    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();

        if path.extension().map_or(false, |e| e == "toml") {
            let content = fs::read_to_string(&path).unwrap();
            let fixture: Fixture = toml::from_str(&content)
                .unwrap_or_else(|e| panic!("invalid fixture {}: {}", path.display(), e));
            let name = path.file_stem().unwrap().to_string_lossy().to_string();
            fixtures.push((name, fixture));
        }
    }

    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    fixtures
}

fn run_fixture(file: &str, fixture: &Fixture) {
    let config = match &fixture.config {
        Some(json) => parse_config(json)
            .unwrap_or_else(|e| panic!("fixture '{}' has invalid config: {}", file, e)),
        None => Config::default(),
    };

    let result = process_html(&fixture.html, &config);

    println!("Fixture '{}' ({}): {} bytes", file, fixture.name, result.len());

    if let Some(expected) = &fixture.expected {
        assert_eq!(
            &result, expected,
            "Fixture '{}' ({}): output mismatch",
            file, fixture.name
        );
    }
    for snippet in &fixture.contains {
        assert!(
            result.contains(snippet.as_str()),
            "Fixture '{}' ({}): expected output to contain\n  {}\ngot:\n{}",
            file,
            fixture.name,
            snippet,
            result
        );
    }
    for snippet in &fixture.absent {
        assert!(
            !result.contains(snippet.as_str()),
            "Fixture '{}' ({}): expected output NOT to contain\n  {}\ngot:\n{}",
            file,
            fixture.name,
            snippet,
            result
        );
    }
}

#[test]
fn test_fixtures() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let fixtures = load_fixtures(&dir);

    assert!(!fixtures.is_empty(), "No fixtures found in {}", dir.display());

    for (file, fixture) in &fixtures {
        run_fixture(file, fixture);
    }
}

#[test]
fn test_paper_end_to_end() {
    // Given: a paper using every marker kind
    let result = process_html(common::PAPER, &Config::default());

    // Then: citations are numbered by first appearance
    assert!(result.contains(
        r#"<ol><li id="bib-knuth">Knuth, D. E. Literate Programming. The Computer Journal, 1984.</li><li id="bib-lamport">Lamport, L. LaTeX: A Document Preparation System, 1986.</li></ol>"#
    ));
    assert_eq!(result.matches(r##"href="#bib-knuth""##).count(), 2);
    // And: the uncited entry is gone everywhere
    assert!(!result.contains("Dijkstra"));
    // And: both footnotes are listed in order
    let first = result.find(r#"<div id="fn-content-1">"#).unwrap();
    let second = result.find(r#"<div id="fn-content-2">"#).unwrap();
    assert!(first < second);
    // And: the citation inside the second footnote was rendered before moving
    assert!(result.contains(
        r##"<a href="#fn-anchor-2">†2</a></sup> See <sup>[<a href="#bib-lamport" title="Lamport, L. LaTeX: A Document Preparation System, 1986.">2</a>]</sup>.</div>"##
    ));
    // And: no marker attributes are left
    assert!(!result.contains("data-cite"));
    assert!(!result.contains("data-footnote"));
    assert!(!result.contains("data-bib-key"));
}

#[test]
fn test_rendering_twice_is_stable_for_styles() {
    let once = process_html(common::PAPER, &Config::default());
    let twice = process_html(&once, &Config::default());

    assert_eq!(twice.matches(r#"<style id="bibliography-style">"#).count(), 1);
    assert_eq!(twice.matches(r#"<style id="footnote-style">"#).count(), 1);
}

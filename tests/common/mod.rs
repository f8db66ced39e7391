//! Shared test constants and helpers for integration tests.

/// A small paper using every marker kind, with both target containers.
///
/// Cites `knuth` twice and `lamport` once; `dijkstra` is declared but never
/// cited. Contains two footnotes, the second one citing `lamport`.
pub const PAPER: &str = r#"<!DOCTYPE html>
<html>
<head><title>Paper</title></head>
<body>
<p>Literate programming <span data-cite="knuth"></span> changed how we write
code<span data-footnote>At least for <em>some</em> of us.</span>.</p>
<p>Typesetting <span data-cite="lamport"></span> built on it
<span data-cite="knuth"></span><span data-footnote>See <span data-cite="lamport"></span>.</span>.</p>
<p data-bib-key="knuth">Knuth, D. E.   <i>Literate Programming</i>.
   The Computer Journal, 1984.</p>
<p data-bib-key="lamport">Lamport, L. LaTeX: A Document Preparation System, 1986.</p>
<p data-bib-key="dijkstra">Dijkstra, E. W. Go To Statement Considered Harmful, 1968.</p>
<h2>References</h2>
<div id="bibliography"></div>
<h2>Notes</h2>
<div id="footnote"></div>
</body>
</html>"#;

/// Build a document from reference entries `(key, text)` and citation keys.
///
/// Entries come first, then one paragraph per citation, then the
/// bibliography container.
#[allow(dead_code)]
pub fn build_document(entries: &[(&str, &str)], cites: &[&str]) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head></head><body>");
    for (key, text) in entries {
        html.push_str(&format!(r#"<p data-bib-key="{}">{}</p>"#, key, text));
    }
    for key in cites {
        html.push_str(&format!(r#"<p>cite <span data-cite="{}"></span></p>"#, key));
    }
    html.push_str(r#"<div id="bibliography"></div></body></html>"#);
    html
}

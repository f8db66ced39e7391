//! Output generation for rendered documents.
//!
//! This module turns a [`Document`] back into HTML text following the HTML
//! fragment serialization rules: void elements get no end tag and the
//! contents of raw-text elements are written verbatim.

use crate::dom::{Document, NodeData, NodeId};
use crate::text::{escape_attribute, escape_text};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written verbatim. `noscript` belongs
/// here because documents are parsed with scripting enabled, which makes the
/// parser keep its content as raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Serializes the whole document, doctype included.
///
/// # Arguments
///
/// * `doc` - The document to serialize
///
/// # Returns
///
/// The HTML text of the document.
pub fn to_html(doc: &Document) -> String {
    inner_html(doc, doc.root())
}

/// Serializes the children of `node`, like DOM `innerHTML`.
pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(node) {
        write_node(doc, child, &mut out);
    }
    out
}

/// One step of the serialization walk.
enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serializes `node` and its subtree into `out`.
///
/// The walk keeps its own stack, so nesting depth is bounded by memory rather
/// than by the thread stack.
fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    let mut stack = vec![Step::Open(node)];

    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Open(id) => id,
            Step::Close(id) => {
                if let Some(name) = doc.local_name(id) {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
                continue;
            }
        };

        match doc.data(id) {
            NodeData::Document | NodeData::Fragment => {
                stack.extend(doc.children(id).iter().rev().map(|&c| Step::Open(c)));
            }
            NodeData::Doctype { name, .. } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Text(text) => {
                let raw = doc
                    .parent(id)
                    .and_then(|p| doc.local_name(p))
                    .map_or(false, |name| RAW_TEXT_ELEMENTS.contains(&name));
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::ProcessingInstruction { target, data } => {
                out.push_str("<?");
                out.push_str(target);
                out.push(' ');
                out.push_str(data);
                out.push('>');
            }
            NodeData::Element(element) => {
                let name = element.local_name();
                out.push('<');
                out.push_str(name);
                for attr in &element.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(&attr.value));
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&name) {
                    continue;
                }
                stack.push(Step::Close(id));
                stack.extend(doc.children(id).iter().rev().map(|&c| Step::Open(c)));
                if let Some(contents) = element.template_contents {
                    stack.push(Step::Open(contents));
                }
            }
        }
    }
}

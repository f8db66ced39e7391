//! Arena-backed HTML document tree.
//!
//! Documents are parsed with html5ever into a flat vector of nodes addressed
//! by [`NodeId`]. Detached nodes stay in the arena; they are simply no longer
//! reachable from the document root, so queries never see them.

use std::borrow::Cow;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ExpandedName, LocalName, Namespace, QualName};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// An attribute with its (possibly prefixed) name, e.g. `href` or `xlink:href`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl From<Attribute> for Attr {
    fn from(attr: Attribute) -> Self {
        let name = match &attr.name.prefix {
            Some(prefix) => format!("{}:{}", prefix, attr.name.local),
            None => attr.name.local.to_string(),
        };
        Attr {
            name,
            value: attr.value.to_string(),
        }
    }
}

/// Element payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: QualName,
    pub attrs: Vec<Attr>,
    /// Fragment node holding the contents of a `<template>`.
    pub template_contents: Option<NodeId>,
}

impl Element {
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Fragment,
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
    Element(Element),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A parsed HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only the root node.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
        }
    }

    /// Parses a complete HTML document.
    ///
    /// Parsing never fails: html5ever recovers from malformed markup the way
    /// browsers do, adding the implied `<html>`, `<head>` and `<body>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use citenote::Document;
    ///
    /// let doc = Document::parse("<p id=intro>Hello</p>");
    /// let intro = doc.element_by_id("intro").unwrap();
    /// assert_eq!(doc.text_content(intro), "Hello");
    /// assert!(doc.head().is_some());
    /// ```
    pub fn parse(html: &str) -> Self {
        html5ever::parse_document(Document::new(), Default::default()).one(html)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::local_name)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    /// Returns every descendant of `id` in document (pre-)order.
    ///
    /// The result is a snapshot: mutating the tree afterwards does not
    /// invalidate it.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Snapshot of all connected elements carrying attribute `name`, in
    /// document order.
    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.attr(id, name).is_some())
            .collect()
    }

    /// First connected element in document order matching `predicate`.
    pub fn find_element<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants(self.root())
            .into_iter()
            .find(|&id| self.element(id).map_or(false, &predicate))
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element(|e| e.attr("id") == Some(id))
    }

    /// The `<head>` element, if the document has one.
    pub fn head(&self) -> Option<NodeId> {
        self.find_element(|e| e.local_name() == "head")
    }

    /// Concatenation of all descendant text nodes, like DOM `textContent`.
    pub fn text_content(&self, id: NodeId) -> String {
        if let NodeData::Text(text) = &self.node(id).data {
            return text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| match &self.node(d).data {
                NodeData::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Creates a detached HTML element with the given attributes.
    pub fn create_element(&mut self, local_name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let name = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(local_name),
        );
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attr {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect();
        self.push(NodeData::Element(Element {
            name,
            attrs,
            template_contents: None,
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Appends `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.insert(index, child);
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    /// Removes `id` (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some((parent, index)) = self.index_in_parent(id) {
            self.node_mut(parent).children.remove(index);
        }
        self.node_mut(id).parent = None;
    }

    /// Puts `replacement` where `old` was and detaches `old`.
    ///
    /// Returns `false` without touching either node when `old` has no parent.
    pub fn replace_with(&mut self, old: NodeId, replacement: NodeId) -> bool {
        let Some((parent, index)) = self.index_in_parent(old) else {
            return false;
        };
        self.detach(old);
        self.insert_child(parent, index, replacement);
        true
    }

    pub fn clear_children(&mut self, id: NodeId) {
        for child in std::mem::take(&mut self.node_mut(id).children) {
            self.node_mut(child).parent = None;
        }
    }

    fn shallow_copy(&mut self, id: NodeId) -> NodeId {
        let data = self.node(id).data.clone();
        self.push(data)
    }

    /// Detached deep copy of `id`, including template contents.
    ///
    /// Copies level by level from a work list, so deeply nested subtrees do
    /// not grow the call stack.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let root = self.shallow_copy(id);
        let mut pending = vec![(id, root)];

        while let Some((source, copy)) = pending.pop() {
            let contents = self.element(source).and_then(|e| e.template_contents);
            if let Some(contents) = contents {
                let contents_copy = self.shallow_copy(contents);
                if let NodeData::Element(element) = &mut self.node_mut(copy).data {
                    element.template_contents = Some(contents_copy);
                }
                pending.push((contents, contents_copy));
            }
            for child in self.node(source).children.clone() {
                let child_copy = self.shallow_copy(child);
                self.append_child(copy, child_copy);
                pending.push((child, child_copy));
            }
        }

        root
    }

    /// Appends deep copies of the children of `from` to `to`.
    pub fn copy_children_into(&mut self, from: NodeId, to: NodeId) {
        for child in self.node(from).children.clone() {
            let copy = self.deep_copy(child);
            self.append_child(to, copy);
        }
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.children(parent).last() {
            if let NodeData::Text(existing) = &mut self.node_mut(last).data {
                existing.push_str(text);
                return;
            }
        }
        let node = self.create_text(text);
        self.append_child(parent, node);
    }
}

impl TreeSink for Document {
    type Handle = NodeId;
    type Output = Self;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&mut self, msg: Cow<'static, str>) {
        tracing::trace!(%msg, "html parse error");
    }

    fn get_document(&mut self) -> NodeId {
        self.root()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> ExpandedName<'a> {
        match &self.node(*target).data {
            NodeData::Element(element) => element.name.expanded(),
            _ => panic!("not an element"),
        }
    }

    fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> NodeId {
        let template_contents = if flags.template {
            Some(self.push(NodeData::Fragment))
        } else {
            None
        };
        self.push(NodeData::Element(Element {
            name,
            attrs: attrs.into_iter().map(Attr::from).collect(),
            template_contents,
        }))
    }

    fn create_comment(&mut self, text: StrTendril) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    fn create_pi(&mut self, target: StrTendril, data: StrTendril) -> NodeId {
        self.push(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })
    }

    fn append(&mut self, parent: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(node) => self.append_child(*parent, node),
            NodeOrText::AppendText(text) => self.append_text(*parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &mut self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        if self.parent(*element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &mut self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let doctype = self.push(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
        self.append_child(self.root(), doctype);
    }

    fn mark_script_already_started(&mut self, _: &NodeId) {}

    fn get_template_contents(&mut self, target: &NodeId) -> NodeId {
        match &self.node(*target).data {
            NodeData::Element(Element {
                template_contents: Some(contents),
                ..
            }) => *contents,
            _ => panic!("not a template element"),
        }
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&mut self, _: QuirksMode) {}

    fn append_before_sibling(&mut self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        match new_node {
            NodeOrText::AppendText(text) => {
                let Some((parent, index)) = self.index_in_parent(*sibling) else {
                    return;
                };
                if index > 0 {
                    let previous = self.children(parent)[index - 1];
                    if let NodeData::Text(existing) = &mut self.node_mut(previous).data {
                        existing.push_str(&text);
                        return;
                    }
                }
                let node = self.create_text(&text);
                self.insert_child(parent, index, node);
            }
            NodeOrText::AppendNode(node) => {
                self.detach(node);
                if let Some((parent, index)) = self.index_in_parent(*sibling) {
                    self.insert_child(parent, index, node);
                }
            }
        }
    }

    fn add_attrs_if_missing(&mut self, target: &NodeId, attrs: Vec<Attribute>) {
        if let NodeData::Element(element) = &mut self.node_mut(*target).data {
            for attr in attrs.into_iter().map(Attr::from) {
                if element.attr(&attr.name).is_none() {
                    element.attrs.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&mut self, target: &NodeId) {
        self.detach(*target);
    }

    fn reparent_children(&mut self, node: &NodeId, new_parent: &NodeId) {
        for child in std::mem::take(&mut self.node_mut(*node).children) {
            self.node_mut(child).parent = Some(*new_parent);
            self.node_mut(*new_parent).children.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adds_implied_structure() {
        let doc = Document::parse("<p>Hi</p>");

        assert!(doc.head().is_some());
        let body = doc.find_element(|e| e.local_name() == "body").unwrap();
        let p = doc.children(body)[0];
        assert_eq!(doc.local_name(p), Some("p"));
        assert_eq!(doc.text_content(p), "Hi");
    }

    #[test]
    fn test_elements_with_attr_document_order() {
        // Given: markers nested at different depths
        let doc = Document::parse(
            r#"<div data-x="1"><span data-x="2"></span></div><p data-x="3"></p><p></p>"#,
        );

        // When: we query by attribute
        let found = doc.elements_with_attr("data-x");

        // Then: they come back in pre-order
        let values: Vec<_> = found.iter().map(|&id| doc.attr(id, "data-x").unwrap()).collect();
        assert_eq!(values, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_boolean_attribute_is_present_with_empty_value() {
        let doc = Document::parse("<span data-footnote>note</span>");
        let found = doc.elements_with_attr("data-footnote");
        assert_eq!(found.len(), 1);
        assert_eq!(doc.attr(found[0], "data-footnote"), Some(""));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let doc = Document::parse("<div id=d>A <b>bold</b> <!-- c --><i>move</i></div>");
        let d = doc.element_by_id("d").unwrap();
        assert_eq!(doc.text_content(d), "A bold move");
    }

    #[test]
    fn test_detached_nodes_are_not_queried() {
        // Given: an element found by id
        let mut doc = Document::parse(r#"<div id="gone"><span id="inner"></span></div>"#);
        let gone = doc.element_by_id("gone").unwrap();

        // When: it is detached
        doc.detach(gone);

        // Then: neither it nor its subtree is reachable any more
        assert!(doc.element_by_id("gone").is_none());
        assert!(doc.element_by_id("inner").is_none());
        assert_eq!(doc.parent(gone), None);
    }

    #[test]
    fn test_replace_with_keeps_position() {
        let mut doc = Document::parse(r#"<p id=p>a<span id=s>x</span>b</p>"#);
        let p = doc.element_by_id("p").unwrap();
        let s = doc.element_by_id("s").unwrap();
        let em = doc.create_element("em", &[]);

        assert!(doc.replace_with(s, em));

        assert_eq!(doc.children(p)[1], em);
        assert_eq!(doc.children(p).len(), 3);
        assert_eq!(doc.parent(em), Some(p));
    }

    #[test]
    fn test_replace_with_without_parent_is_noop() {
        let mut doc = Document::new();
        let orphan = doc.create_element("span", &[]);
        let replacement = doc.create_element("sup", &[]);

        assert!(!doc.replace_with(orphan, replacement));
        assert_eq!(doc.parent(replacement), None);
    }

    #[test]
    fn test_clear_children() {
        let mut doc = Document::parse(r#"<div id=d><p>1</p><p>2</p></div>"#);
        let d = doc.element_by_id("d").unwrap();
        doc.clear_children(d);
        assert!(doc.children(d).is_empty());
        assert_eq!(doc.text_content(d), "");
    }

    #[test]
    fn test_copy_children_into_is_independent() {
        // Given: a source element with nested markup
        let mut doc = Document::parse(r#"<div id=src>see <a href="x">link</a></div><div id=dst></div>"#);
        let src = doc.element_by_id("src").unwrap();
        let dst = doc.element_by_id("dst").unwrap();

        // When: its children are copied and the source is cleared
        doc.copy_children_into(src, dst);
        doc.clear_children(src);

        // Then: the copy survives
        assert_eq!(doc.text_content(dst), "see link");
        assert_eq!(doc.text_content(src), "");
    }

    #[test]
    fn test_deep_copy_of_deeply_nested_subtree() {
        // Given: a source element wrapping a very deep chain of spans
        let depth = 100_000;
        let html = format!(r#"<div id=src>{}x</div><div id=dst></div>"#, "<span>".repeat(depth));
        let mut doc = Document::parse(&html);
        let src = doc.element_by_id("src").unwrap();
        let dst = doc.element_by_id("dst").unwrap();

        // When: its children are copied
        doc.copy_children_into(src, dst);

        // Then: the whole chain is duplicated without touching the source
        let copied = doc.descendants(dst);
        assert_eq!(copied.len(), depth + 1);
        assert_eq!(doc.text_content(dst), "x");
        assert_eq!(doc.descendants(src).len(), depth + 1);
    }

    #[test]
    fn test_deep_copy_keeps_template_contents_separate() {
        let mut doc = Document::parse("<div id=src><template><b>t</b></template></div>");
        let src = doc.element_by_id("src").unwrap();
        let template = doc.children(src)[0];

        let copy = doc.deep_copy(template);

        let original = doc.element(template).unwrap().template_contents.unwrap();
        let copied = doc.element(copy).unwrap().template_contents.unwrap();
        assert_ne!(original, copied);
        assert_eq!(doc.text_content(copied), "t");
    }
}

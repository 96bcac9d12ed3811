//! Arena-based DOM consumed by the printer.
//!
//! This module provides the read-only tree the printer walks.
//! Key features:
//! - **indextree Arena**: All nodes in contiguous memory, parent and sibling links for free
//! - **Shared strings**: Text, comments and attribute values are StrTendrils that share the
//!   source buffer via refcounting
//! - **html5ever TreeSink**: Browser-compatible tree construction straight into the arena

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, Namespace, QualName, parse_document};
use indexmap::IndexMap;
use indextree::{Arena, NodeId};
use std::borrow::Cow;
use std::cell::RefCell;
use std::io;

use crate::{PrintError, PrintOptions, print_to_string};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Document = Arena + the id of its Document node
#[derive(Debug, Clone)]
pub struct Document {
    /// THE tree - all nodes live here
    pub arena: Arena<NodeKind>,

    /// The Document node (parent of the doctype and `<html>`)
    pub root: NodeId,
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of the doctype and `<html>`)
    Document,
    /// `<!DOCTYPE name>`
    Doctype(StrTendril),
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content (StrTendril is refcounted - cheap to clone)
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
}

impl NodeKind {
    /// Short lowercase name of the node type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Doctype(_) => "doctype",
            NodeKind::Element(_) => "element",
            NodeKind::Text(_) => "text",
            NodeKind::Comment(_) => "comment",
        }
    }
}

/// Element data (name + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Qualified name as reported by the tree builder
    pub name: QualName,

    /// Attributes in source order. Keys include the namespace prefix when there is one
    /// (`xlink:href`); only the first of duplicated attributes is kept.
    pub attrs: IndexMap<String, StrTendril>,
}

impl ElementData {
    /// Local tag name, e.g. `div`.
    pub fn tag(&self) -> &str {
        &self.name.local
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding nothing but its Document node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeKind::Document);
        Document { arena, root }
    }

    /// Parse HTML into an arena-based Document.
    ///
    /// Parsing never fails: html5ever recovers from malformed input the way browsers do.
    pub fn parse(html: &str) -> Self {
        // html5ever creates subtendrils that share this buffer via refcounting
        let tendril = StrTendril::from(html);
        parse_document(ArenaSink::new(), Default::default()).one(tendril)
    }

    /// Parse UTF-8 encoded HTML from a reader.
    pub fn read_from<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        parse_document(ArenaSink::new(), Default::default())
            .from_utf8()
            .read_from(reader)
    }

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeKind {
        self.arena[id].get()
    }

    /// Iterate children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].previous_sibling()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next_sibling()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].first_child()
    }

    /// The node's child if it has exactly one.
    pub fn only_child(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.arena[id];
        match (node.first_child(), node.last_child()) {
            (Some(first), Some(last)) if first == last => Some(first),
            _ => None,
        }
    }

    /// Element data if `id` is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.get(id) {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    /// Tag name if `id` is an element
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    /// DOCTYPE name if present (usually "html")
    pub fn doctype(&self) -> Option<&str> {
        self.children(self.root).find_map(|id| match self.get(id) {
            NodeKind::Doctype(name) => Some(name.as_ref()),
            _ => None,
        })
    }

    /// The top-level element (usually `<html>`)
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| matches!(self.get(id), NodeKind::Element(_)))
    }

    /// Get the `<head>` element if present
    pub fn head(&self) -> Option<NodeId> {
        self.top_level_child("head")
    }

    /// Get the `<body>` element if present
    pub fn body(&self) -> Option<NodeId> {
        self.top_level_child("body")
    }

    fn top_level_child(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html).find(|&id| self.tag(id) == Some(tag))
    }

    /// Append a new HTML element named `tag` under `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
        self.append_node(
            parent,
            NodeKind::Element(ElementData {
                name,
                attrs: IndexMap::new(),
            }),
        )
    }

    /// Set an attribute on an element; does nothing for other node kinds.
    /// An empty value prints as a bare attribute name.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        if let NodeKind::Element(elem) = self.arena[id].get_mut() {
            elem.attrs.insert(key.to_string(), StrTendril::from(value));
        }
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append_node(parent, NodeKind::Text(StrTendril::from(text)))
    }

    /// Append a comment node under `parent`.
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append_node(parent, NodeKind::Comment(StrTendril::from(text)))
    }

    /// Append a doctype node under `parent` (normally the Document node).
    pub fn append_doctype(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.append_node(parent, NodeKind::Doctype(StrTendril::from(name)))
    }

    fn append_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.arena.new_node(kind);
        parent.append(id, &mut self.arena);
        id
    }

    /// Pretty-print this document to a string.
    pub fn to_pretty_html(&self, options: &PrintOptions) -> Result<String, PrintError> {
        print_to_string(self, options)
    }
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink implementation for building the arena DOM
struct ArenaSink {
    /// Arena wrapped in RefCell since TreeSink methods take `&self`
    arena: RefCell<Arena<NodeKind>>,

    /// Document node (parent of `<html>`)
    document: NodeId,
}

impl ArenaSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeKind::Document);

        ArenaSink {
            arena: RefCell::new(arena),
            document,
        }
    }

    fn new_node(&self, kind: NodeKind) -> NodeId {
        self.arena.borrow_mut().new_node(kind)
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        Document {
            arena: self.arena.into_inner(),
            root: self.document,
        }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // Ignore parse errors (html5ever recovers automatically)
    }

    fn get_document(&self) -> Self::Handle {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {
        // Quirks mode doesn't change how we print
    }

    fn same_node(&self, a: &Self::Handle, b: &Self::Handle) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> OwnedElemName {
        match self.arena.borrow()[*target].get() {
            NodeKind::Element(elem) => OwnedElemName(elem.name.clone()),
            // Not an element - return placeholder
            _ => OwnedElemName(QualName::new(
                None,
                Namespace::from(HTML_NAMESPACE),
                LocalName::from(""),
            )),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|attr| (attr_key(&attr.name), attr.value))
            .collect();
        self.new_node(NodeKind::Element(ElementData { name, attrs }))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.new_node(NodeKind::Comment(text))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        // Processing instructions only exist in XML; keep them as comments
        self.new_node(NodeKind::Comment(data))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                // Merge with a preceding text node so each run of text is one node
                if let Some(last_child) = arena[*parent].last_child()
                    && let NodeKind::Text(existing) = arena[last_child].get_mut()
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = arena.new_node(NodeKind::Text(text));
                parent.append(text_node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut arena = self.arena.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => arena.new_node(NodeKind::Text(text)),
        };
        sibling.insert_before(node, &mut arena);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.arena.borrow()[*element].parent().is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let doctype = self.new_node(NodeKind::Doctype(name));
        self.document
            .append(doctype, &mut self.arena.borrow_mut());
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are printed as ordinary children of the <template> element
        *target
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(elem) = arena[*target].get_mut() {
            for attr in attrs {
                elem.attrs
                    .entry(attr_key(&attr.name))
                    .or_insert(attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}

/// Attribute key as printed: `prefix:local` for namespaced attributes.
fn attr_key(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

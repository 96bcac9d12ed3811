//! Pretty-printer for the arena DOM.
//!
//! Walks a parsed [`Document`] and writes it back out re-indented and wrapped,
//! without changing what a browser would render:
//!
//! - Block elements start on their own line and nest their children one level deeper
//! - Inline elements stay in the flow of the surrounding text; a line is only broken
//!   next to them where the source already had whitespace
//! - Short leaf elements (`<title>X</title>`) are kept on a single line
//! - Literal elements (script, style, noscript) are copied byte-for-byte
//! - Keep-space elements (pre) keep their whitespace but are still escaped
//! - Void elements never get end tags; `<li>` end tags are omitted
//! - Comments are dropped

use std::io::{self, Write};

use facet::Facet;
use indextree::NodeId;

use crate::dom::{Document, ElementData, NodeKind};
use crate::tags::{TagClass, classify};
use crate::text::{
    Neighbors, collapse, escape_attr_value, escape_text, is_html_whitespace, normalize_class,
};
use crate::writer::LineWriter;
use crate::{debug, trace};

/// Options for pretty-printing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintOptions {
    /// String written once per nesting level (default: two spaces). May be empty.
    pub indent: String,
    /// Preferred maximum line length in bytes (default: 120). 0 disables wrapping.
    pub wrap: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            wrap: 120,
        }
    }
}

impl PrintOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the string used for one level of indentation.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Wrap lines at `width` bytes where possible. 0 disables wrapping.
    pub fn wrap(mut self, width: usize) -> Self {
        self.wrap = width;
        self
    }

    /// Disable line wrapping: only block boundaries start new lines.
    pub fn no_wrap(self) -> Self {
        self.wrap(0)
    }
}

/// Errors that can occur while printing.
#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum PrintError {
    /// root node has non-document type {kind}
    NotADocument { kind: String },

    /// unhandled {kind} node under the document
    UnexpectedDocumentChild { kind: String },

    /// unexpected {kind} node inside <{parent}>
    UnexpectedChild { kind: String, parent: String },

    /// failed writing output: {message}
    Io { message: String },
}

impl From<io::Error> for PrintError {
    fn from(err: io::Error) -> Self {
        PrintError::Io {
            message: err.to_string(),
        }
    }
}

/// Pretty-print `doc` to `out`.
pub fn print<W: Write>(out: W, doc: &Document, options: &PrintOptions) -> Result<(), PrintError> {
    print_node(out, doc, doc.root, options)
}

/// Pretty-print the document rooted at `root`, which must be a Document node.
pub fn print_node<W: Write>(
    out: W,
    doc: &Document,
    root: NodeId,
    options: &PrintOptions,
) -> Result<(), PrintError> {
    debug!(wrap = options.wrap, "printing document");
    let mut printer = Printer {
        doc,
        out: LineWriter::new(out, &options.indent, options.wrap),
    };
    printer.document(root)?;
    printer.out.finish()?;
    debug!("printed document");
    Ok(())
}

/// Pretty-print `doc` to a string.
pub fn print_to_string(doc: &Document, options: &PrintOptions) -> Result<String, PrintError> {
    let mut out = Vec::new();
    print(&mut out, doc, options)?;
    // Everything we write comes from `&str`s
    Ok(String::from_utf8(out)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned()))
}

struct Printer<'a, W: Write> {
    doc: &'a Document,
    out: LineWriter<'a, W>,
}

impl<'a, W: Write> Printer<'a, W> {
    /// Entry point: the Document node, its doctype and its single element.
    fn document(&mut self, id: NodeId) -> Result<(), PrintError> {
        let kind = self.doc.get(id);
        if !matches!(kind, NodeKind::Document) {
            return Err(PrintError::NotADocument {
                kind: kind.type_name().to_string(),
            });
        }

        for child in self.doc.children(id) {
            match self.doc.get(child) {
                NodeKind::Doctype(name) => {
                    self.out.write(&format!("<!DOCTYPE {}>", &**name));
                    self.out.end_line();
                }
                NodeKind::Element(elem) => self.element(child, elem)?,
                other => {
                    return Err(PrintError::UnexpectedDocumentChild {
                        kind: other.type_name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn element(&mut self, id: NodeId, elem: &'a ElementData) -> Result<(), PrintError> {
        let tag = elem.tag();
        let class = classify(tag);

        let mut inline = class.inline;
        if self.open_tag(id, elem, class) {
            inline = true;
        }

        if class.void {
            if class.preserves_content() {
                panic!("<{tag}> is both void and literal/keep-space");
            }
            return Ok(());
        }

        // Preserve the formatting of everything inside if needed
        if class.literal {
            self.out.literal_depth += 1;
        }
        if class.keep_space {
            self.out.keep_space_depth += 1;
        }

        let has_children = self.doc.first_child(id).is_some();
        let nested = !inline || (class.list && has_children);
        if nested {
            if !class.omit_close {
                self.out.end_line();
            }
            self.out.level += 1;
        }

        for child in self.doc.children(id) {
            match self.doc.get(child) {
                NodeKind::Element(child_elem) => {
                    self.element(child, child_elem)?;
                    if class.list {
                        self.out.end_line();
                    }
                }
                NodeKind::Text(text) => self.text(child, text),
                NodeKind::Comment(_) => {}
                other => {
                    return Err(PrintError::UnexpectedChild {
                        kind: other.type_name().to_string(),
                        parent: tag.to_string(),
                    });
                }
            }
        }

        if nested {
            self.out.level -= 1;
            self.out.end_line();
        }

        // The closing tag is never wrapped
        if !class.omit_close {
            self.out.indent();
            self.out.write(&close_tag(tag));
        }
        if class.literal {
            self.out.literal_depth -= 1;
        }
        if class.keep_space {
            self.out.keep_space_depth -= 1;
        }
        if !inline {
            self.out.end_line();
        }
        Ok(())
    }

    /// Write the opening tag of `id`. Returns true if the whole element fits on the
    /// current line and should be printed inline.
    fn open_tag(&mut self, id: NodeId, elem: &ElementData, class: TagClass) -> bool {
        let tokens = open_tag_tokens(elem);
        let tag_len: usize = tokens.iter().map(String::len).sum();

        // Start a new line for block elements. Inline elements also start a new line if
        // they'd be wrapped, unless they're in or right after another inline element or
        // after text that doesn't end in whitespace: a line break there would add a space.
        let would_wrap = self.out.would_overflow(tag_len);
        let start_space_matters = self.is_inline(self.doc.previous_sibling(id))
            || self.is_inline(self.doc.parent(id))
            || self.prev_text_glued(id);
        if !class.inline || (would_wrap && !start_space_matters) {
            self.out.end_line();
        }

        let started_line = self.out.at_line_start();
        self.out.indent();

        let fits_inline = self.fits_on_line(id, elem, class, tag_len);
        if fits_inline && !class.inline {
            debug!(tag = elem.tag(), "keeping short element on one line");
        }

        // Attributes that wrap onto a new line are indented two extra levels
        let mut wrap_indent = String::new();
        let mut unwrapped = 0;
        if started_line {
            wrap_indent = self.out.indent_unit().repeat(2);
            unwrapped = 1;
            // If the tag name is shorter than the continuation indent, keep the first
            // attribute next to it
            if tokens[0].len() < wrap_indent.len() {
                unwrapped = 2;
            }
        } else if (class.inline || fits_inline) && start_space_matters {
            unwrapped = 1;
        }

        for (i, token) in tokens.iter().enumerate() {
            if i < unwrapped {
                self.out.write(token);
            } else {
                self.out.wrap(token, &wrap_indent);
            }
        }

        fits_inline
    }

    /// Whether an element with no children, or a single text child, fits on the
    /// current line together with its closing tag.
    fn fits_on_line(&self, id: NodeId, elem: &ElementData, class: TagClass, tag_len: usize) -> bool {
        if class.preserves_content() || self.out.in_literal() || self.out.in_keep_space() {
            return false;
        }

        let child_len = match self.doc.first_child(id) {
            None => 0,
            Some(_) => match self.doc.only_child(id).map(|child| (child, self.doc.get(child))) {
                Some((child, NodeKind::Text(text))) => {
                    collapse(&escape_text(text), self.neighbors(child)).len()
                }
                _ => return false,
            },
        };

        let wrap = self.out.wrap_width();
        let width = self.out.line_width() + tag_len + child_len + close_tag_len(elem.tag(), class);
        trace!(tag = elem.tag(), width, wrap, "single-line width");
        wrap == 0 || width < wrap
    }

    fn text(&mut self, id: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }

        // Write literal text... literally
        if self.out.in_literal() {
            self.out.write(text);
            return;
        }

        let escaped = escape_text(text);
        if self.out.in_keep_space() {
            // The parser drops a newline right after the start tag, so a leading one
            // must be written twice to survive
            if text.starts_with('\n') && self.starts_keep_space_element(id) {
                self.out.write("\n");
            }
            self.out.write(&escaped);
            return;
        }

        let collapsed = collapse(&escaped, self.neighbors(id));
        if collapsed.is_empty() {
            return;
        }

        // Children of list-like elements each get their own line, which stands in
        // for any whitespace between them
        if collapsed == " " && self.in_list(id) {
            return;
        }

        self.out.indent();

        // A lone space between inline elements is deliberate; write it as is rather
        // than as a word
        if collapsed == " " {
            self.out.write(" ");
            return;
        }

        let start_space = collapsed.starts_with(' ');
        let end_space = collapsed.ends_with(' ');

        // Don't wrap before the first word if it's glued to a preceding inline element:
        // "(<a>link</a>)" must not become "(<a>link</a>\n)"
        let glued = !start_space
            && (self.is_inline(self.doc.previous_sibling(id)) || self.is_inline(self.doc.parent(id)));

        let words: Vec<&str> = collapsed.split(' ').filter(|w| !w.is_empty()).collect();
        let last = words.len().saturating_sub(1);
        for (i, word) in words.iter().enumerate() {
            let mut token = String::with_capacity(word.len() + 2);
            if i > 0 || start_space {
                token.push(' ');
            }
            token.push_str(word);
            if i == last && end_space {
                token.push(' ');
            }

            if i == 0 && glued {
                self.out.write(&token);
            } else {
                self.out.wrap(&token, "");
            }
        }
    }

    fn is_inline(&self, id: Option<NodeId>) -> bool {
        id.and_then(|id| self.doc.tag(id))
            .is_some_and(|tag| classify(tag).inline)
    }

    /// Whether `id` is the first child of a keep-space element like `<pre>`.
    fn starts_keep_space_element(&self, id: NodeId) -> bool {
        self.doc.previous_sibling(id).is_none()
            && self
                .doc
                .parent(id)
                .and_then(|parent| self.doc.tag(parent))
                .is_some_and(|tag| classify(tag).keep_space)
    }

    fn in_list(&self, id: NodeId) -> bool {
        self.doc
            .parent(id)
            .and_then(|parent| self.doc.tag(parent))
            .is_some_and(|tag| classify(tag).list)
    }

    /// Whether the previous sibling is text that doesn't end in whitespace.
    fn prev_text_glued(&self, id: NodeId) -> bool {
        match self.doc.previous_sibling(id).map(|prev| self.doc.get(prev)) {
            Some(NodeKind::Text(text)) => !text.ends_with(is_html_whitespace),
            _ => false,
        }
    }

    fn neighbors(&self, id: NodeId) -> Neighbors {
        Neighbors {
            prev_inline: self.is_inline(self.doc.previous_sibling(id)),
            next_inline: self.is_inline(self.doc.next_sibling(id)),
            parent_inline: self.is_inline(self.doc.parent(id)),
        }
    }
}

/// Opening tag split into wrap points: `["<foo", " abc", " def=\"123\">"]`.
/// The closing bracket is fused onto the last token so it never wraps alone.
fn open_tag_tokens(elem: &ElementData) -> Vec<String> {
    let mut tokens = Vec::with_capacity(elem.attrs.len() + 1);
    tokens.push(format!("<{}", elem.tag()));
    for (key, value) in &elem.attrs {
        let mut token = format!(" {key}");
        if !value.is_empty() {
            let mut value = escape_attr_value(value).into_owned();
            if key == "class" {
                value = normalize_class(&value);
            }
            token.push_str("=\"");
            token.push_str(&value);
            token.push('"');
        }
        tokens.push(token);
    }
    if let Some(last) = tokens.last_mut() {
        last.push('>');
    }
    tokens
}

fn close_tag(tag: &str) -> String {
    format!("</{tag}>")
}

/// Length of the closing tag as printed; void and omit-close elements have none.
fn close_tag_len(tag: &str, class: TagClass) -> usize {
    if class.void || class.omit_close {
        0
    } else {
        tag.len() + 3
    }
}

//! Static tag classification.
//!
//! The printer never looks at tag names directly: it asks [`classify`] for a
//! [`TagClass`] and acts on the flags. Tuning the output for a tag means editing
//! one of the tables below.

/// Void elements per <https://html.spec.whatwg.org/multipage/syntax.html#void-elements>.
/// They never have children or end tags.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that appear inline, based on
/// <https://developer.mozilla.org/en-US/docs/Web/HTML/Inline_elements>.
///
/// No line break is added before or after them and their contents aren't nested:
/// the first child follows the opening tag directly and the last child precedes the
/// closing tag. Spaces in text next to these tags are preserved.
pub const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "amp-img", "b", "big", "cite", "code", "data", "def", "del", "dfn",
    "em", "i", "img", "ins", "kbd", "mark", "picture", "q", "s", "small", "source", "span",
    "strong", "sub", "sup", "svg", "time", "tt", "u", "wbr",
];

/// Elements whose children go on their own indented lines even when the element
/// itself is inline (`<picture>` with its `<source>` and `<img>`, nested `<amp-img>`).
pub const LIST_TAGS: &[&str] = &["amp-img", "ol", "picture", "svg", "ul"];

/// Non-void elements whose closing tags are omitted.
/// A line break is still printed where the closing tag would have been.
pub const OMIT_CLOSE_TAGS: &[&str] = &["li"];

/// Elements whose contents are printed unchanged: no escaping, no whitespace changes.
pub const LITERAL_TAGS: &[&str] = &["noscript", "script", "style"];

/// Elements whose contents keep their whitespace but are still escaped.
pub const KEEP_SPACE_TAGS: &[&str] = &["pre"];

/// Behavior flags for one tag name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagClass {
    pub void: bool,
    pub inline: bool,
    pub list: bool,
    pub omit_close: bool,
    pub literal: bool,
    pub keep_space: bool,
}

impl TagClass {
    /// Whether contents of this element are reproduced without whitespace changes.
    pub fn preserves_content(&self) -> bool {
        self.literal || self.keep_space
    }

    /// A void element can't carry verbatim content, and content is either
    /// literal or keep-space, never both.
    pub fn is_consistent(&self) -> bool {
        !(self.void && self.preserves_content()) && !(self.literal && self.keep_space)
    }
}

/// Classify a tag name. Unknown tags are ordinary block elements.
pub fn classify(tag: &str) -> TagClass {
    TagClass {
        void: VOID_TAGS.contains(&tag),
        inline: INLINE_TAGS.contains(&tag),
        list: LIST_TAGS.contains(&tag),
        omit_close: OMIT_CLOSE_TAGS.contains(&tag),
        literal: LITERAL_TAGS.contains(&tag),
        keep_space: KEEP_SPACE_TAGS.contains(&tag),
    }
}

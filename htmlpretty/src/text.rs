//! Escaping and whitespace collapsing for text and attribute values.

use std::borrow::Cow;

/// The five ASCII whitespace characters HTML recognizes: tab, LF, FF, CR and space.
pub fn is_html_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// Escape text content: `&`, `<` and `>` only.
///
/// Quotes are left alone; outside of attribute values they don't need escaping
/// and escaping them makes the output noisy.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attr_value(value: &str) -> Cow<'_, str> {
    if value.contains('"') {
        Cow::Owned(value.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Replace every run of HTML whitespace with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if is_html_whitespace(c) {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Normalize a `class` attribute value: collapse whitespace runs, drop leading
/// and trailing whitespace.
pub fn normalize_class(value: &str) -> String {
    collapse_whitespace(value).trim_matches(' ').to_string()
}

/// Which nodes around a text node are inline elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub prev_inline: bool,
    pub next_inline: bool,
    pub parent_inline: bool,
}

/// Collapse whitespace in text that sits in an inline formatting context.
///
/// This approximates what browsers do
/// (<https://developer.mozilla.org/en-US/docs/Web/API/Document_Object_Model/Whitespace>):
/// whitespace runs become one space, and a leading or trailing space is dropped
/// when nothing inline would be printed next to it, since the printer's own line
/// breaks stand in for it. Inside an inline parent, both are kept.
///
/// Getting this exactly right needs the computed CSS `display` of every element,
/// which we don't have.
pub fn collapse(text: &str, neighbors: Neighbors) -> String {
    let mut collapsed = collapse_whitespace(text);
    if !neighbors.parent_inline {
        if !neighbors.next_inline {
            let len = collapsed.trim_end_matches(' ').len();
            collapsed.truncate(len);
        }
        if !neighbors.prev_inline && collapsed.starts_with(' ') {
            collapsed.remove(0);
        }
    }
    collapsed
}

//! Line-oriented output with indentation, greedy wrapping and a sticky first error.

use std::io::{self, Write};

use crate::trace;

/// Tracks where we are on the current line and how deep we are in nested
/// indentation and content-preserving regions.
///
/// The first I/O error is kept and every later write becomes a no-op, so callers
/// can keep emitting and check once at the end via [`LineWriter::finish`].
pub(crate) struct LineWriter<'a, W: Write> {
    out: W,
    error: Option<io::Error>,
    indent_unit: &'a str,
    /// 0 disables wrapping
    wrap_width: usize,

    /// Current indentation level
    pub(crate) level: usize,
    /// Number of literal elements (e.g. `<script>`) we're nested in
    pub(crate) literal_depth: usize,
    /// Number of keep-space elements (e.g. `<pre>`) we're nested in
    pub(crate) keep_space_depth: usize,
    line_start: bool,
    line_width: usize,
}

impl<'a, W: Write> LineWriter<'a, W> {
    pub(crate) fn new(out: W, indent_unit: &'a str, wrap_width: usize) -> Self {
        Self {
            out,
            error: None,
            indent_unit,
            wrap_width,
            level: 0,
            literal_depth: 0,
            keep_space_depth: 0,
            line_start: true,
            line_width: 0,
        }
    }

    pub(crate) fn in_literal(&self) -> bool {
        self.literal_depth > 0
    }

    pub(crate) fn in_keep_space(&self) -> bool {
        self.keep_space_depth > 0
    }

    fn preserving(&self) -> bool {
        self.in_literal() || self.in_keep_space()
    }

    pub(crate) fn at_line_start(&self) -> bool {
        self.line_start
    }

    pub(crate) fn line_width(&self) -> usize {
        self.line_width
    }

    pub(crate) fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    pub(crate) fn indent_unit(&self) -> &'a str {
        self.indent_unit
    }

    /// Whether `len` more bytes on the current line would exceed the wrap width.
    pub(crate) fn would_overflow(&self, len: usize) -> bool {
        self.wrap_width > 0 && self.line_width + len > self.wrap_width
    }

    /// Write `s` verbatim.
    pub(crate) fn write(&mut self, s: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.out.write_all(s.as_bytes()) {
            self.error = Some(err);
        }
        self.line_start = false;
        self.line_width += s.len();
    }

    /// Write the indentation for the current level if we're at the start of a line.
    /// Content-preserving regions never get synthetic indentation.
    pub(crate) fn indent(&mut self) {
        if self.preserving() || !self.line_start {
            return;
        }
        // Written even when empty so the line counts as started
        let indent = self.indent_unit.repeat(self.level);
        self.write(&indent);
    }

    /// Terminate the current line. Does nothing at the start of a line or inside
    /// content-preserving regions.
    pub(crate) fn end_line(&mut self) {
        if self.preserving() || self.line_start {
            return;
        }
        self.write("\n");
        self.line_start = true;
        self.line_width = 0;
    }

    /// Write `s`, first breaking the line if it would exceed the wrap width.
    /// On a break, leading spaces of `s` are dropped and `extra` is written after
    /// the regular indentation.
    pub(crate) fn wrap(&mut self, s: &str, extra: &str) {
        if !self.preserving() && self.would_overflow(s.len()) {
            trace!(
                token = s,
                width = self.line_width,
                "wrapping before token"
            );
            self.end_line();
            self.indent();
            self.write(extra);
            self.write(s.trim_start_matches(' '));
        } else {
            self.write(s);
        }
    }

    /// Flush the sink and return it, or the first error seen while writing.
    pub(crate) fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

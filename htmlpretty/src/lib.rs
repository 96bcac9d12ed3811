//! HTML5 pretty-printer based on html5ever and an indextree arena DOM.
//!
//! htmlpretty provides:
//! - **Arena DOM**: a read-only node tree with parent and sibling links
//! - **Parsing**: browser-compatible HTML5 parsing via html5ever with full error recovery
//! - **Printing**: re-indented, line-wrapped serialization that keeps the page's
//!   rendered whitespace intact
//!
//! # Example
//!
//! ```rust
//! use htmlpretty::{Document, PrintOptions, print_to_string};
//!
//! let doc = Document::parse("<html><head><title>\n  Hi</title></head><body>text</body></html>");
//! let html = print_to_string(&doc, &PrintOptions::new().wrap(80)).unwrap();
//! assert_eq!(
//!     html,
//!     "<html>\n  <head>\n    <title>Hi</title>\n  </head>\n  <body>text</body>\n</html>\n"
//! );
//! ```

mod tracing_macros;

pub mod dom;
pub mod printer;
pub mod tags;
pub mod text;
mod writer;

pub(crate) use tracing_macros::{debug, trace};

// Re-export the DOM at crate root for convenience
pub use dom::{Document, ElementData, NodeKind};
pub use indextree::NodeId;

// Re-export printing
pub use printer::{PrintError, PrintOptions, print, print_node, print_to_string};

//! DOM manipulation layer over an arena-based HTML tree.
//!
//! grafter provides:
//! - **Arena DOM**: all nodes in one `indextree` arena, ids stay valid across mutation
//! - **Parsing**: browser-compatible HTML5 parsing via html5ever with full error recovery
//! - **Traversal**: filtered walks of the parent/sibling pointer chains
//! - **Insertion**: heterogeneous content (markup, nodes, position maps) placed at
//!   `top`/`bottom`/`before`/`after`/`instead`, with markup-context-aware fragment
//!   construction for table and select destinations
//! - **Mutation**: `replace`, `update`, `remove`, `wrap`, `clean` with embedded-script
//!   extraction and post-mutation execution
//!
//! # Example
//!
//! ```rust
//! use grafter::parse;
//!
//! let mut doc = parse("<html><body><ul id=\"menu\"><li>First</li></ul></body></html>");
//! let list = doc
//!     .body()
//!     .and_then(|body| doc.sub_nodes(body).first().copied())
//!     .unwrap();
//!
//! doc.insert(list, "<li>Last</li>", None);
//! doc.insert(list, "<li>Zeroth</li>", Some("top"));
//! assert_eq!(
//!     doc.inner_html(list),
//!     "<li>Zeroth</li><li>First</li><li>Last</li>"
//! );
//! ```

mod tracing_macros;

mod content;
mod dom;
mod insert;
mod parser;
mod serialize;
mod traverse;

// Re-export the DOM types at crate root for convenience
pub use dom::{Document, ElementData, Namespace, NodeData, NodeKind};

// Content model and script handling
pub use content::{Content, InertScripts, Position, ScriptHost};

// Traversal engine
pub use traverse::{Direction, Matcher};

// Parsing entry point
pub use parser::parse;

/// Node handle - an index into the document's arena.
pub use indextree::NodeId;

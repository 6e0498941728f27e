//! Document model: the node arena behind the editable surface.
//!
//! - **`node`**: `NodeId`, the `NodeKind` tagged union and tag normalization
//! - **`attributes`**: insertion-ordered attribute map
//! - **`style`**: the `style` attribute as an ordered declaration list
//! - **`tree`**: `DocumentTree`, creation, structure queries and mutation

pub mod attributes;
pub mod node;
pub mod style;
pub mod tree;

pub use attributes::Attributes;
pub use node::{LEAF_TAGS, Node, NodeId, NodeKind, normalize_tag};
pub use style::{Style, format_px};
pub use tree::{DEFAULT_ROOT_TAG, DocumentTree};

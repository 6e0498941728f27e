use std::fmt;

use uuid::Uuid;

use crate::document::Attributes;

/// Tags whose elements can never own children.
pub const LEAF_TAGS: &[&str] = &["img", "br"];

/// Stable identity of a node inside a [`crate::DocumentTree`] arena.
///
/// Ids are minted once per node and never reused, so a stale id simply stops
/// resolving after the node it named has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two node variants of the document model
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Leaf carrying character data
    Text { content: String },
    /// Tagged element owning its children exclusively
    Element {
        tag: String,
        attributes: Attributes,
        children: Vec<NodeId>,
    },
}

/// A node stored in the arena together with its back-link to the owning parent
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn text(content: String) -> Self {
        Self {
            parent: None,
            kind: NodeKind::Text { content },
        }
    }

    pub(crate) fn element(tag: String, attributes: Attributes) -> Self {
        Self {
            parent: None,
            kind: NodeKind::Element {
                tag,
                attributes,
                children: Vec::new(),
            },
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    /// Element tag, `None` for text nodes
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }

    /// Child ids; always empty for text nodes
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Element { children, .. } => children,
            NodeKind::Text { .. } => &[],
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text { .. } => None,
        }
    }

    /// Whether this node may hold children at all
    pub fn accepts_children(&self) -> bool {
        match &self.kind {
            NodeKind::Element { tag, .. } => !LEAF_TAGS.contains(&tag.as_str()),
            NodeKind::Text { .. } => false,
        }
    }

    /// Largest valid offset: character count for text, child count for elements
    pub fn max_offset(&self) -> usize {
        match &self.kind {
            NodeKind::Text { content } => content.chars().count(),
            NodeKind::Element { children, .. } => children.len(),
        }
    }
}

/// Lower-case and trim a tag name; `None` when nothing is left
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() { None } else { Some(tag) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("STRONG").as_deref(), Some("strong"));
        assert_eq!(normalize_tag(" Em ").as_deref(), Some("em"));
        assert_eq!(normalize_tag(""), None);
        assert_eq!(normalize_tag("   "), None);
    }

    #[test]
    fn test_text_node_has_no_children() {
        let node = Node::text("hi".to_string());
        assert!(node.children().is_empty());
        assert!(!node.accepts_children());
        assert_eq!(node.max_offset(), 2);
    }

    #[test]
    fn test_img_is_leaf() {
        let img = Node::element("img".to_string(), Attributes::new());
        let p = Node::element("p".to_string(), Attributes::new());
        assert!(!img.accepts_children());
        assert!(p.accepts_children());
    }

    #[test]
    fn test_max_offset_counts_chars_not_bytes() {
        let node = Node::text("héllo 🦀".to_string());
        assert_eq!(node.max_offset(), 7);
    }
}

use std::collections::HashMap;

use crate::document::{Attributes, Node, NodeId, NodeKind, Style, normalize_tag};

/// Tag used for the editable surface container when none is configured
pub const DEFAULT_ROOT_TAG: &str = "div";

/// In-memory document model: an arena of nodes forming one strict tree.
///
/// ## Ownership
///
/// Every element owns its children exclusively. Inserting a node anywhere
/// first detaches it from its previous parent, so a node can never appear
/// twice and cycles are refused outright.
///
/// ## Detached nodes
///
/// Nodes can exist in the arena without being reachable from the root
/// (freshly created, or extracted by a selection command). They are only
/// dropped by [`DocumentTree::remove`] or [`DocumentTree::clear_children`];
/// `is_mounted` tells the two apart.
///
/// ## Root
///
/// The root element is created with the tree and is never replaced,
/// detached or removed. Loading and clearing mutate its children instead.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
}

impl DocumentTree {
    /// Create an empty document whose root element carries `root_tag`
    pub fn new(root_tag: &str) -> Self {
        let tag = normalize_tag(root_tag).unwrap_or_else(|| DEFAULT_ROOT_TAG.to_string());
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::element(tag, Attributes::new()));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Number of nodes in the arena, mounted or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    // ============ Creation ============

    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, Node::text(content.into()));
        id
    }

    /// Create a detached element. Returns `None` for an empty tag.
    pub fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        let tag = normalize_tag(tag)?;
        let id = NodeId::new();
        self.nodes.insert(id, Node::element(tag, Attributes::new()));
        Some(id)
    }

    /// Create a detached element with the same tag and attributes as `id`
    pub fn clone_shell(&mut self, id: NodeId) -> Option<NodeId> {
        let (tag, attributes) = match &self.get(id)?.kind {
            NodeKind::Element {
                tag, attributes, ..
            } => (tag.clone(), attributes.clone()),
            NodeKind::Text { .. } => return None,
        };
        let shell = NodeId::new();
        self.nodes.insert(shell, Node::element(tag, attributes));
        Some(shell)
    }

    // ============ Node data ============

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.tag()
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_text)
    }

    /// Content of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Text { content } => Some(content),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) -> bool {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(NodeKind::Text { content }) => {
                *content = value.into();
                true
            }
            _ => false,
        }
    }

    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        self.get(id)?.attributes()
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)?.get(name)
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.attributes_mut(id) {
            Some(attributes) => {
                attributes.set(name, value);
                true
            }
            None => false,
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.attributes_mut(id)?.remove(name)
    }

    /// Parsed `style` attribute; empty when absent
    pub fn style(&self, id: NodeId) -> Style {
        self.attribute(id, "style")
            .map(Style::parse)
            .unwrap_or_default()
    }

    /// Write `style` back, dropping the attribute when nothing is left
    pub fn set_style(&mut self, id: NodeId, style: &Style) -> bool {
        if style.is_empty() {
            let is_element = self.attributes(id).is_some();
            self.remove_attribute(id, "style");
            is_element
        } else {
            self.set_attribute(id, "style", style.to_string())
        }
    }

    fn attributes_mut(&mut self, id: NodeId) -> Option<&mut Attributes> {
        match &mut self.nodes.get_mut(&id)?.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text { .. } => None,
        }
    }

    fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.nodes.get_mut(&id)?.kind {
            NodeKind::Element { children, .. } => Some(children),
            NodeKind::Text { .. } => None,
        }
    }

    // ============ Structure queries ============

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|child| *child == id)
    }

    /// Character count of a text node, child count of an element
    pub fn max_offset(&self, id: NodeId) -> usize {
        self.get(id).map(Node::max_offset).unwrap_or(0)
    }

    /// Strict ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            ancestors.push(node);
            current = self.parent(node);
        }
        ancestors
    }

    /// Whether `node` is `ancestor` or lies somewhere below it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// Whether `id` is reachable from the root
    pub fn is_mounted(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id) && self.contains(self.root, id)
    }

    /// Deepest node containing both `a` and `b` (inclusive)
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        if !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return None;
        }
        let mut chain_a = vec![a];
        chain_a.extend(self.ancestors(a));
        let mut current = Some(b);
        while let Some(node) = current {
            if chain_a.contains(&node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Child indices leading from the root to `id`; `None` when not mounted
    pub fn path(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = id;
        while current != self.root {
            path.push(self.index_in_parent(current)?);
            current = self.parent(current)?;
        }
        path.reverse();
        Some(path)
    }

    /// `id` and everything below it, in document (pre-)order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Concatenated text of every text node below `id`
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|node| self.text(node))
            .collect()
    }

    // ============ Mutation ============

    /// Whether `child` may be placed under `parent` without breaking the tree invariants
    pub fn can_insert(&self, parent: NodeId, child: NodeId) -> bool {
        self.get(parent).is_some_and(Node::accepts_children)
            && self.nodes.contains_key(&child)
            && child != self.root
            && !self.contains(child, parent)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` at `index` under `parent`, detaching it from wherever it was.
    ///
    /// Refused (returning `false`) when the parent cannot hold children, the
    /// child is the root, or the insertion would create a cycle. `index` is
    /// clamped to the child count and interpreted before the detach, so moving
    /// a node later within the same parent lands where the caller pointed.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> bool {
        if !self.can_insert(parent, child) {
            return false;
        }

        let mut index = index.min(self.children(parent).len());
        if self.parent(child) == Some(parent)
            && let Some(current) = self.index_in_parent(child)
            && current < index
        {
            index -= 1;
        }
        self.detach(child);

        let Some(children) = self.children_mut(parent) else {
            return false;
        };
        children.insert(index.min(children.len()), child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        true
    }

    /// Unlink `id` from its parent, keeping it (and its subtree) in the arena
    pub fn detach(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(children) = self.children_mut(parent) {
            children.retain(|child| *child != id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
        true
    }

    /// Detach `id` and drop its whole subtree from the arena
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.nodes.contains_key(&id) {
            return false;
        }
        self.detach(id);
        for node in self.descendants(id) {
            self.nodes.remove(&node);
        }
        true
    }

    /// Put `new` in the slot occupied by `old`, then drop `old`'s subtree
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        if old == new || self.contains(new, old) {
            return false;
        }
        let (Some(parent), Some(index)) = (self.parent(old), self.index_in_parent(old)) else {
            return false;
        };
        if !self.insert_child(parent, index, new) {
            return false;
        }
        self.remove(old)
    }

    /// Drop every child subtree of `parent`
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = self.children(parent).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// Split a mounted text node at a character offset.
    ///
    /// The original node keeps the leading part; the trailing part becomes a
    /// new sibling directly after it and its id is returned. Offsets at either
    /// end (or past it) leave the node untouched and return `None`.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let content = self.text(id)?;
        if offset == 0 || offset >= content.chars().count() {
            return None;
        }
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;

        let byte = byte_offset(content, offset);
        let tail = content[byte..].to_string();
        let head = content[..byte].to_string();

        self.set_text(id, head);
        let right = self.create_text(tail);
        self.insert_child(parent, index + 1, right);
        Some(right)
    }

    /// Structural equality of two subtrees, possibly from different trees:
    /// same variants, tags, attributes and children, in order.
    pub fn subtree_eq(&self, id: NodeId, other: &DocumentTree, other_id: NodeId) -> bool {
        let (Some(a), Some(b)) = (self.get(id), other.get(other_id)) else {
            return false;
        };
        match (&a.kind, &b.kind) {
            (NodeKind::Text { content: x }, NodeKind::Text { content: y }) => x == y,
            (
                NodeKind::Element {
                    tag: tag_a,
                    attributes: attrs_a,
                    children: children_a,
                },
                NodeKind::Element {
                    tag: tag_b,
                    attributes: attrs_b,
                    children: children_b,
                },
            ) => {
                tag_a == tag_b
                    && attrs_a == attrs_b
                    && children_a.len() == children_b.len()
                    && children_a
                        .iter()
                        .zip(children_b)
                        .all(|(x, y)| self.subtree_eq(*x, other, *y))
            }
            _ => false,
        }
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_TAG)
    }
}

/// Byte index of the `chars`-th character, clamped to the string length
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph_with(tree: &mut DocumentTree, texts: &[&str]) -> NodeId {
        let p = tree.create_element("p").unwrap();
        for text in texts {
            let t = tree.create_text(*text);
            tree.append_child(p, t);
        }
        let root = tree.root();
        tree.append_child(root, p);
        p
    }

    #[test]
    fn test_new_tree_has_lowercase_root() {
        let tree = DocumentTree::new("DIV");
        assert_eq!(tree.tag(tree.root()), Some("div"));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_empty_root_tag_falls_back() {
        let tree = DocumentTree::new("  ");
        assert_eq!(tree.tag(tree.root()), Some(DEFAULT_ROOT_TAG));
    }

    #[test]
    fn test_create_element_rejects_empty_tag() {
        let mut tree = DocumentTree::default();
        assert!(tree.create_element("").is_none());
        let id = tree.create_element("Strong").unwrap();
        assert_eq!(tree.tag(id), Some("strong"));
    }

    #[test]
    fn test_insert_moves_between_parents() {
        let mut tree = DocumentTree::default();
        let a = paragraph_with(&mut tree, &["x"]);
        let b = paragraph_with(&mut tree, &[]);
        let x = tree.children(a)[0];

        assert!(tree.append_child(b, x));

        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[x]);
        assert_eq!(tree.parent(x), Some(b));
    }

    #[test]
    fn test_insert_refuses_cycles_and_leaves() {
        let mut tree = DocumentTree::default();
        let p = paragraph_with(&mut tree, &["x"]);
        let x = tree.children(p)[0];
        let img = tree.create_element("img").unwrap();
        let root = tree.root();

        assert!(!tree.append_child(p, p));
        assert!(!tree.append_child(p, root));
        assert!(!tree.append_child(x, p), "text nodes have no children");
        assert!(!tree.append_child(img, x), "img is a leaf");
        assert_eq!(tree.parent(x), Some(p));
    }

    #[test]
    fn test_insert_later_within_same_parent() {
        let mut tree = DocumentTree::default();
        let p = paragraph_with(&mut tree, &["a", "b", "c"]);
        let [a, b, c] = [tree.children(p)[0], tree.children(p)[1], tree.children(p)[2]];

        tree.insert_child(p, 3, a);

        assert_eq!(tree.children(p), &[b, c, a]);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = DocumentTree::default();
        let p = paragraph_with(&mut tree, &["x", "y"]);
        let before = tree.len();

        assert!(tree.remove(p));

        assert_eq!(tree.len(), before - 3);
        assert!(tree.is_empty());
        assert!(!tree.remove(tree.root()));
    }

    #[test]
    fn test_split_text_mid_content() {
        let mut tree = DocumentTree::default();
        let p = paragraph_with(&mut tree, &["hello world"]);
        let t = tree.children(p)[0];

        let right = tree.split_text(t, 6).unwrap();

        assert_eq!(tree.text(t), Some("hello "));
        assert_eq!(tree.text(right), Some("world"));
        assert_eq!(tree.children(p), &[t, right]);
    }

    #[test]
    fn test_split_text_at_edges_is_noop() {
        let mut tree = DocumentTree::default();
        let p = paragraph_with(&mut tree, &["abc"]);
        let t = tree.children(p)[0];

        assert!(tree.split_text(t, 0).is_none());
        assert!(tree.split_text(t, 3).is_none());
        assert_eq!(tree.children(p).len(), 1);
    }

    #[test]
    fn test_split_text_multibyte() {
        let mut tree = DocumentTree::default();
        let p = paragraph_with(&mut tree, &["日本語"]);
        let t = tree.children(p)[0];

        let right = tree.split_text(t, 1).unwrap();

        assert_eq!(tree.text(t), Some("日"));
        assert_eq!(tree.text(right), Some("本語"));
    }

    #[test]
    fn test_common_ancestor_and_path() {
        let mut tree = DocumentTree::default();
        let p1 = paragraph_with(&mut tree, &["a"]);
        let p2 = paragraph_with(&mut tree, &["b"]);
        let a = tree.children(p1)[0];
        let b = tree.children(p2)[0];

        assert_eq!(tree.common_ancestor(a, b), Some(tree.root()));
        assert_eq!(tree.common_ancestor(a, p1), Some(p1));
        assert_eq!(tree.path(b), Some(vec![1, 0]));
        assert_eq!(tree.path(tree.root()), Some(vec![]));
    }

    #[test]
    fn test_replace_and_text_content() {
        let mut tree = DocumentTree::default();
        let p = paragraph_with(&mut tree, &["one ", "two"]);
        assert_eq!(tree.text_content(p), "one two");

        let t = tree.create_text("three");
        assert!(tree.replace(p, t));

        assert_eq!(tree.children(tree.root()), &[t]);
        assert!(tree.get(p).is_none());
    }

    #[test]
    fn test_mounted_vs_detached() {
        let mut tree = DocumentTree::default();
        let p = paragraph_with(&mut tree, &["x"]);
        let loose = tree.create_text("loose");

        assert!(tree.is_mounted(p));
        assert!(!tree.is_mounted(loose));
        tree.detach(p);
        assert!(!tree.is_mounted(p));
    }

    #[test]
    fn test_style_roundtrip_through_attribute() {
        let mut tree = DocumentTree::default();
        let img = tree.create_element("img").unwrap();
        let mut style = tree.style(img);
        style.set_px("width", 120.0);
        tree.set_style(img, &style);

        assert_eq!(tree.attribute(img, "style"), Some("width: 120px"));

        tree.set_style(img, &Style::new());
        assert_eq!(tree.attribute(img, "style"), None);
    }

    #[test]
    fn test_subtree_eq_across_trees() {
        let mut left = DocumentTree::default();
        let mut right = DocumentTree::default();
        paragraph_with(&mut left, &["same"]);
        paragraph_with(&mut right, &["same"]);
        assert!(left.subtree_eq(left.root(), &right, right.root()));

        paragraph_with(&mut right, &["extra"]);
        assert!(!left.subtree_eq(left.root(), &right, right.root()));
    }
}

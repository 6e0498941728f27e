//! Selection model: tree positions, ranges, the host's single selection slot,
//! and the two range primitives every command is built from
//! (`extract_contents` and `insert_at`).

use std::cmp::Ordering;

use crate::document::{DocumentTree, NodeId};

/// A point in the tree: character offset inside a text node, child index
/// inside an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// Position in `node`'s parent just before it
    pub fn before(tree: &DocumentTree, node: NodeId) -> Option<Self> {
        Some(Self::new(tree.parent(node)?, tree.index_in_parent(node)?))
    }

    /// Position in `node`'s parent just after it
    pub fn after(tree: &DocumentTree, node: NodeId) -> Option<Self> {
        Some(Self::new(tree.parent(node)?, tree.index_in_parent(node)? + 1))
    }

    /// Position at the end of an element's children (child-count offset)
    pub fn inside_end(tree: &DocumentTree, element: NodeId) -> Option<Self> {
        tree.tag(element)?;
        Some(Self::new(element, tree.children(element).len()))
    }

    /// Mounted node and offset within bounds
    pub fn is_valid(&self, tree: &DocumentTree) -> bool {
        tree.is_mounted(self.node) && self.offset <= tree.max_offset(self.node)
    }

    /// A position inside an element that cannot own children (`img`, `br`)
    /// moves to just before that element.
    pub fn normalized(self, tree: &DocumentTree) -> Option<Self> {
        let node = tree.get(self.node)?;
        if node.is_text() || node.accepts_children() {
            Some(self)
        } else {
            Self::before(tree, self.node)
        }
    }
}

/// Document order of two mounted positions
pub fn compare_positions(tree: &DocumentTree, a: Position, b: Position) -> Option<Ordering> {
    if a.node == b.node {
        return Some(a.offset.cmp(&b.offset));
    }
    let path_a = tree.path(a.node)?;
    let path_b = tree.path(b.node)?;

    // One node contains the other: compare the offset against the index of
    // the child leading towards the deeper node.
    if path_b.starts_with(&path_a) {
        let child_index = path_b[path_a.len()];
        return Some(if a.offset <= child_index {
            Ordering::Less
        } else {
            Ordering::Greater
        });
    }
    if path_a.starts_with(&path_b) {
        let child_index = path_a[path_b.len()];
        return Some(if b.offset <= child_index {
            Ordering::Greater
        } else {
            Ordering::Less
        });
    }
    Some(path_a.cmp(&path_b))
}

/// Anchor/focus pair as reported by the host. The anchor may lie after the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub anchor: Position,
    pub focus: Position,
}

impl SelectionRange {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(at: Position) -> Self {
        Self::new(at, at)
    }

    /// Range over `start..end` characters of a single text node
    pub fn within_text(node: NodeId, start: usize, end: usize) -> Self {
        Self::new(Position::new(node, start), Position::new(node, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Both ends refer to mounted nodes with in-range offsets
    pub fn is_valid(&self, tree: &DocumentTree) -> bool {
        self.anchor.is_valid(tree) && self.focus.is_valid(tree)
    }

    /// `(start, end)` in document order; `None` for an invalid range
    pub fn ordered(&self, tree: &DocumentTree) -> Option<(Position, Position)> {
        if !self.is_valid(tree) {
            return None;
        }
        let anchor = self.anchor.normalized(tree)?;
        let focus = self.focus.normalized(tree)?;
        match compare_positions(tree, anchor, focus)? {
            Ordering::Greater => Some((focus, anchor)),
            _ => Some((anchor, focus)),
        }
    }

    pub fn start(&self, tree: &DocumentTree) -> Option<Position> {
        self.ordered(tree).map(|(start, _)| start)
    }

    pub fn end(&self, tree: &DocumentTree) -> Option<Position> {
        self.ordered(tree).map(|(_, end)| end)
    }
}

/// The host's single active selection plus the range saved at gesture time.
///
/// Anything that steals focus (a toolbar click, an input field opening)
/// overwrites the active slot, so commands fired from such gestures `save`
/// first and `restore_saved` right before mutating.
#[derive(Debug, Clone, Default)]
pub struct SelectionSlot {
    active: Option<SelectionRange>,
    saved: Option<SelectionRange>,
}

impl SelectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the active selection; `None` is a normal outcome
    pub fn capture(&self) -> Option<SelectionRange> {
        self.active
    }

    /// Make `range` the active selection
    pub fn restore(&mut self, range: SelectionRange) {
        self.active = Some(range);
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Remember the active selection for a later `restore_saved`
    pub fn save(&mut self) -> bool {
        self.saved = self.active;
        self.saved.is_some()
    }

    pub fn saved(&self) -> Option<SelectionRange> {
        self.saved
    }

    /// Consume the saved range, making it active when it is still valid, and
    /// return whatever valid selection is active afterwards.
    pub fn restore_saved(&mut self, tree: &DocumentTree) -> Option<SelectionRange> {
        if let Some(saved) = self.saved.take()
            && saved.is_valid(tree)
        {
            self.active = Some(saved);
        }
        self.active.filter(|range| range.is_valid(tree))
    }

    /// Collapse the active selection onto its document-order end
    pub fn collapse_to_end(&mut self, tree: &DocumentTree) -> bool {
        match self.active.and_then(|range| range.end(tree)) {
            Some(end) => {
                self.active = Some(SelectionRange::collapsed(end));
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.saved = None;
    }
}

/// Detached forest removed from between a range's ends
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Top-level detached nodes, in document order
    pub fragment: Vec<NodeId>,
    /// Where the removed content used to start
    pub at: Position,
}

/// Element-level boundary that stays put while neighbouring text nodes split
#[derive(Debug, Clone, Copy)]
enum Boundary {
    Before(NodeId),
    End(NodeId),
}

impl Boundary {
    fn after(tree: &DocumentTree, node: NodeId) -> Option<Self> {
        let parent = tree.parent(node)?;
        let index = tree.index_in_parent(node)?;
        Some(match tree.children(parent).get(index + 1) {
            Some(next) => Boundary::Before(*next),
            None => Boundary::End(parent),
        })
    }

    fn resolve(self, tree: &DocumentTree) -> Option<(NodeId, usize)> {
        match self {
            Boundary::Before(node) => Some((tree.parent(node)?, tree.index_in_parent(node)?)),
            Boundary::End(parent) => Some((parent, tree.children(parent).len())),
        }
    }
}

/// Turn a position into an element-level boundary, splitting a text node
/// when the position falls mid-content.
fn boundary_at(tree: &mut DocumentTree, position: Position) -> Option<Boundary> {
    if tree.is_text(position.node) {
        let len = tree.max_offset(position.node);
        if position.offset == 0 {
            Some(Boundary::Before(position.node))
        } else if position.offset >= len {
            Boundary::after(tree, position.node)
        } else {
            tree.split_text(position.node, position.offset)
                .map(Boundary::Before)
        }
    } else {
        Some(match tree.children(position.node).get(position.offset) {
            Some(child) => Boundary::Before(*child),
            None => Boundary::End(position.node),
        })
    }
}

/// Remove everything between the range's ends and return it as a detached forest.
///
/// Boundary text nodes are split first so the fragment holds whole nodes.
/// When the ends sit under different parents, the partially covered
/// ancestors below their common ancestor are split by cloning their shells:
/// the originals keep the unselected parts, the clones carry the selected
/// parts. Returns `None` (leaving the tree as it was, apart from harmless
/// text splits) for invalid or empty ranges.
pub fn extract_contents(tree: &mut DocumentTree, range: &SelectionRange) -> Option<Extraction> {
    let (start, end) = range.ordered(tree)?;
    if start == end {
        return None;
    }

    // Split the end first: splitting only ever inserts after the split node,
    // so the start position stays valid.
    let end_boundary = boundary_at(tree, end)?;
    let start_boundary = boundary_at(tree, start)?;
    let (start_parent, start_index) = start_boundary.resolve(tree)?;
    let (end_parent, end_index) = end_boundary.resolve(tree)?;

    if start_parent == end_parent {
        if start_index >= end_index {
            return None;
        }
        let fragment = tree.children(start_parent)[start_index..end_index].to_vec();
        for node in &fragment {
            tree.detach(*node);
        }
        return Some(Extraction {
            fragment,
            at: Position::new(start_parent, start_index),
        });
    }

    let common = tree.common_ancestor(start_parent, end_parent)?;

    let (start_clone, first_index) = if start_parent == common {
        (None, start_index)
    } else {
        let (clone, top) = split_off_tail(tree, start_parent, start_index, common)?;
        (Some(clone), tree.index_in_parent(top)? + 1)
    };
    let (end_clone, last_index) = if end_parent == common {
        (None, end_index)
    } else {
        let (clone, top) = split_off_head(tree, end_parent, end_index, common)?;
        (Some(clone), tree.index_in_parent(top)?)
    };

    let middle = tree
        .children(common)
        .get(first_index..last_index)
        .map(<[NodeId]>::to_vec)
        .unwrap_or_default();
    for node in &middle {
        tree.detach(*node);
    }

    let fragment = start_clone
        .into_iter()
        .chain(middle)
        .chain(end_clone)
        .collect();
    Some(Extraction {
        fragment,
        at: Position::new(common, first_index),
    })
}

/// Move `level.children[from..]` and the trailing siblings of every ancestor
/// up to (not including) `stop` into a chain of cloned shells. Returns the
/// outermost clone and the original ancestor it was cloned from.
fn split_off_tail(
    tree: &mut DocumentTree,
    level: NodeId,
    from: usize,
    stop: NodeId,
) -> Option<(NodeId, NodeId)> {
    let mut clone = tree.clone_shell(level)?;
    for child in tree.children(level).get(from..).unwrap_or_default().to_vec() {
        tree.append_child(clone, child);
    }

    let mut node = level;
    while let Some(parent) = tree.parent(node)
        && parent != stop
    {
        let shell = tree.clone_shell(parent)?;
        let index = tree.index_in_parent(node)?;
        tree.append_child(shell, clone);
        for sibling in tree.children(parent)[index + 1..].to_vec() {
            tree.append_child(shell, sibling);
        }
        clone = shell;
        node = parent;
    }
    Some((clone, node))
}

/// Mirror of [`split_off_tail`] for the end side: moves `level.children[..to]`
/// and the leading siblings of every ancestor below `stop`.
fn split_off_head(
    tree: &mut DocumentTree,
    level: NodeId,
    to: usize,
    stop: NodeId,
) -> Option<(NodeId, NodeId)> {
    let mut clone = tree.clone_shell(level)?;
    for child in tree.children(level).get(..to).unwrap_or_default().to_vec() {
        tree.append_child(clone, child);
    }

    let mut node = level;
    while let Some(parent) = tree.parent(node)
        && parent != stop
    {
        let shell = tree.clone_shell(parent)?;
        let index = tree.index_in_parent(node)?;
        for sibling in tree.children(parent)[..index].to_vec() {
            tree.append_child(shell, sibling);
        }
        tree.append_child(shell, clone);
        clone = shell;
        node = parent;
    }
    Some((clone, node))
}

/// Insert `node` at `position`, splitting a text node when needed.
/// Returns the position immediately after the inserted node.
pub fn insert_at(tree: &mut DocumentTree, position: Position, node: NodeId) -> Option<Position> {
    if !position.is_valid(tree) {
        return None;
    }
    let position = position.normalized(tree)?;
    let (parent, index) = if tree.is_text(position.node) {
        let parent = tree.parent(position.node)?;
        let index = tree.index_in_parent(position.node)?;
        if !tree.can_insert(parent, node) {
            return None;
        }
        if position.offset == 0 {
            (parent, index)
        } else if position.offset >= tree.max_offset(position.node) {
            (parent, index + 1)
        } else {
            tree.split_text(position.node, position.offset)?;
            (parent, index + 1)
        }
    } else {
        (position.node, position.offset)
    };

    if !tree.insert_child(parent, index, node) {
        return None;
    }
    Position::after(tree, node)
}

/// Put an extracted fragment back at `at`, in order
pub fn restore_fragment(tree: &mut DocumentTree, at: Position, fragment: &[NodeId]) -> bool {
    fragment
        .iter()
        .enumerate()
        .all(|(i, node)| tree.insert_child(at.node, at.offset + i, *node))
}

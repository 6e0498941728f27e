//! Selection-relative tree edits behind the formatting commands.
//!
//! Each function takes the range it should act on and returns the position
//! the caret should collapse to, or `None` when nothing changed. A `None`
//! always leaves the document coherent: extracted content is either inside
//! its new wrapper in the tree or back where it came from.

use log::debug;

use crate::document::{DocumentTree, LEAF_TAGS, NodeId, normalize_tag};
use crate::editing::selection::{
    Position, SelectionRange, extract_contents, insert_at, restore_fragment,
};
use crate::serialization::is_supported_tag;

/// Block elements offered by the insert menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    H1,
    H2,
    H3,
    OrderedList,
    UnorderedList,
}

impl BlockKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalize_tag(tag)?.as_str() {
            "h1" => Some(BlockKind::H1),
            "h2" => Some(BlockKind::H2),
            "h3" => Some(BlockKind::H3),
            "ol" => Some(BlockKind::OrderedList),
            "ul" => Some(BlockKind::UnorderedList),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::H1 => "h1",
            BlockKind::H2 => "h2",
            BlockKind::H3 => "h3",
            BlockKind::OrderedList => "ol",
            BlockKind::UnorderedList => "ul",
        }
    }

    /// Text of the heading, or of the single list item a new list starts with
    pub fn placeholder(&self) -> &'static str {
        match self {
            BlockKind::H1 => "New H1 Element",
            BlockKind::H2 => "New H2 Element",
            BlockKind::H3 => "New H3 Element",
            BlockKind::OrderedList => "New Ordered List Item",
            BlockKind::UnorderedList => "New Unordered List Item",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockKind::OrderedList | BlockKind::UnorderedList)
    }
}

/// Wrap or unwrap the range in `tag`.
///
/// Only the immediate common-ancestor element is inspected: the common
/// ancestor itself when it is an element, its parent when it is a text node.
/// Formatting two or more levels up is not detected, and an unwrap flattens
/// the element to a single text node.
///
/// Tags the loader would reject, and tags that cannot own children, are
/// refused so every wrapper survives a save and reload.
pub fn toggle_inline(
    tree: &mut DocumentTree,
    range: &SelectionRange,
    tag: &str,
) -> Option<Position> {
    let tag = normalize_tag(tag)?;
    if !is_supported_tag(tree, &tag) || LEAF_TAGS.contains(&tag.as_str()) {
        debug!("Refusing to wrap in unsupported tag <{tag}>");
        return None;
    }
    if range.is_collapsed() {
        return None;
    }
    let (start, end) = range.ordered(tree)?;
    let common = tree.common_ancestor(start.node, end.node)?;
    let element = if tree.is_text(common) {
        tree.parent(common)?
    } else {
        common
    };

    if element != tree.root() && tree.tag(element) == Some(tag.as_str()) {
        return unwrap(tree, element);
    }

    let wrapper = tree.create_element(&tag)?;
    wrap_range(tree, range, wrapper)
}

/// Replace `element` with one text node holding its text content
fn unwrap(tree: &mut DocumentTree, element: NodeId) -> Option<Position> {
    let content = tree.text_content(element);
    let text = tree.create_text(content);
    if !tree.replace(element, text) {
        tree.remove(text);
        return None;
    }
    Position::after(tree, text)
}

/// Move the range's contents into `wrapper` and put `wrapper` where they were.
/// Returns the position right after the wrapper.
pub fn wrap_range(
    tree: &mut DocumentTree,
    range: &SelectionRange,
    wrapper: NodeId,
) -> Option<Position> {
    let accepts = tree.get(wrapper).is_some_and(|node| node.accepts_children());
    let extraction = if accepts {
        extract_contents(tree, range)
    } else {
        None
    };
    let Some(extraction) = extraction else {
        tree.remove(wrapper);
        return None;
    };

    for node in &extraction.fragment {
        tree.append_child(wrapper, *node);
    }
    match insert_at(tree, extraction.at, wrapper) {
        Some(after) => Some(after),
        None => {
            let fragment = tree.children(wrapper).to_vec();
            restore_fragment(tree, extraction.at, &fragment);
            tree.remove(wrapper);
            None
        }
    }
}

/// Wrap the range in a link opening in a new browsing context
pub fn insert_hyperlink(
    tree: &mut DocumentTree,
    range: &SelectionRange,
    href: &str,
) -> Option<Position> {
    if href.trim().is_empty() || range.is_collapsed() || !range.is_valid(tree) {
        return None;
    }
    let anchor = tree.create_element("a")?;
    tree.set_attribute(anchor, "href", href);
    tree.set_attribute(anchor, "target", "_blank");
    tree.set_attribute(anchor, "rel", "noopener noreferrer");
    wrap_range(tree, range, anchor)
}

fn build_block(tree: &mut DocumentTree, kind: BlockKind) -> Option<NodeId> {
    let block = tree.create_element(kind.tag())?;
    let text = tree.create_text(kind.placeholder());
    if kind.is_list() {
        let item = tree.create_element("li")?;
        tree.append_child(item, text);
        tree.append_child(block, item);
    } else {
        tree.append_child(block, text);
    }
    Some(block)
}

/// Insert a pre-populated block at the range start.
///
/// The returned caret sits inside the new block after its last child (a
/// child-count offset, since lists have no direct text leaf).
pub fn insert_block(
    tree: &mut DocumentTree,
    range: &SelectionRange,
    kind: BlockKind,
) -> Option<Position> {
    let start = range.start(tree)?;
    let block = build_block(tree, kind)?;
    if insert_at(tree, start, block).is_none() {
        tree.remove(block);
        return None;
    }
    Position::inside_end(tree, block)
}

/// Insert an `img` at the range start; returns the image and the caret after it
pub fn insert_image(
    tree: &mut DocumentTree,
    range: &SelectionRange,
    source: &str,
    alt: Option<&str>,
    style: &str,
) -> Option<(NodeId, Position)> {
    if source.is_empty() {
        return None;
    }
    let start = range.start(tree)?;

    let image = tree.create_element("img")?;
    tree.set_attribute(image, "src", source);
    if let Some(alt) = alt.filter(|alt| !alt.is_empty()) {
        tree.set_attribute(image, "alt", alt);
    }
    if !style.trim().is_empty() {
        tree.set_attribute(image, "style", style);
    }

    match insert_at(tree, start, image) {
        Some(after) => Some((image, after)),
        None => {
            tree.remove(image);
            None
        }
    }
}

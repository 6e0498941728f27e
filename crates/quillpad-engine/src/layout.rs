//! Geometry reported by whatever renders the document.
//!
//! The engine never measures anything itself. Image manipulation and the
//! selection highlight ask a [`Layout`] for client rectangles, so the same
//! code runs against a browser surface, a native view or a test fixture.

use std::collections::HashMap;

use crate::document::NodeId;
use crate::editing::SelectionRange;
use crate::media::{Point, Rect};

pub trait Layout {
    /// Client rect of the editable surface container
    fn container_rect(&self) -> Rect;

    /// Client rect of a rendered node, `None` when it is not laid out
    fn node_rect(&self, node: NodeId) -> Option<Rect>;

    /// Offset of a node from the container's origin
    fn node_offset(&self, node: NodeId) -> Option<Point> {
        let rect = self.node_rect(node)?;
        Some(rect.relative_to(&self.container_rect()).origin())
    }

    /// Client rects covered by a range, one per line box
    fn selection_rects(&self, range: &SelectionRange) -> Vec<Rect>;
}

/// Fixed geometry, for headless hosts and tests
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    pub container: Rect,
    pub nodes: HashMap<NodeId, Rect>,
    pub selection: Vec<Rect>,
}

impl StaticLayout {
    pub fn new(container: Rect) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    pub fn with_node(mut self, node: NodeId, rect: Rect) -> Self {
        self.nodes.insert(node, rect);
        self
    }

    pub fn with_selection_rects(mut self, rects: Vec<Rect>) -> Self {
        self.selection = rects;
        self
    }
}

impl Layout for StaticLayout {
    fn container_rect(&self) -> Rect {
        self.container
    }

    fn node_rect(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(&node).copied()
    }

    fn selection_rects(&self, _range: &SelectionRange) -> Vec<Rect> {
        self.selection.clone()
    }
}

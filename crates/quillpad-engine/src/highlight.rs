//! Translucent boxes drawn behind the selected text, so the selection stays
//! visible while focus sits in a toolbar or input field.

use log::trace;
use serde::Serialize;

use crate::document::DocumentTree;
use crate::editing::SelectionRange;
use crate::layout::Layout;
use crate::media::Rect;

pub const HIGHLIGHT_COLOR: &str = "rgba(255, 255, 0, 0.3)";
pub const HIGHLIGHT_Z_INDEX: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightBox {
    /// Container-relative, one per line box of the selection
    pub rect: Rect,
    pub z_index: i32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct HighlightOverlay {
    boxes: Vec<HighlightBox>,
}

impl HighlightOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw for the current selection.
    ///
    /// A missing, invalid or collapsed range leaves the previous boxes in
    /// place; only blur removes them. Returns whether the boxes were redrawn.
    pub fn on_selection_change(
        &mut self,
        tree: &DocumentTree,
        range: Option<&SelectionRange>,
        layout: &dyn Layout,
    ) -> bool {
        let Some(range) = range.filter(|range| !range.is_collapsed() && range.is_valid(tree))
        else {
            return false;
        };

        let container = layout.container_rect();
        self.boxes = layout
            .selection_rects(range)
            .into_iter()
            .map(|rect| HighlightBox {
                rect: rect.relative_to(&container),
                z_index: HIGHLIGHT_Z_INDEX,
                color: HIGHLIGHT_COLOR,
            })
            .collect();
        trace!("Drew {} highlight boxes", self.boxes.len());
        true
    }

    pub fn on_blur(&mut self) {
        self.boxes.clear();
    }

    pub fn boxes(&self) -> &[HighlightBox] {
        &self.boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Position;
    use crate::layout::StaticLayout;

    fn setup() -> (DocumentTree, SelectionRange, StaticLayout) {
        let mut tree = DocumentTree::default();
        let text = tree.create_text("two lines of text");
        let root = tree.root();
        tree.append_child(root, text);

        let layout = StaticLayout::new(Rect::new(10.0, 20.0, 300.0, 200.0)).with_selection_rects(
            vec![
                Rect::new(15.0, 25.0, 280.0, 16.0),
                Rect::new(10.0, 41.0, 40.0, 16.0),
            ],
        );
        (tree, SelectionRange::within_text(text, 0, 12), layout)
    }

    #[test]
    fn test_boxes_relative_to_container() {
        let (tree, range, layout) = setup();
        let mut overlay = HighlightOverlay::new();

        assert!(overlay.on_selection_change(&tree, Some(&range), &layout));
        assert_eq!(overlay.boxes().len(), 2);
        assert_eq!(overlay.boxes()[0].rect, Rect::new(5.0, 5.0, 280.0, 16.0));
        assert_eq!(overlay.boxes()[1].rect, Rect::new(0.0, 21.0, 40.0, 16.0));
        assert!(overlay.boxes().iter().all(|b| b.z_index == -1));
        assert!(overlay.boxes().iter().all(|b| b.color == HIGHLIGHT_COLOR));
    }

    #[test]
    fn test_collapsed_selection_keeps_previous_boxes() {
        let (tree, range, layout) = setup();
        let mut overlay = HighlightOverlay::new();
        overlay.on_selection_change(&tree, Some(&range), &layout);

        let caret = SelectionRange::collapsed(Position::new(range.anchor.node, 3));
        assert!(!overlay.on_selection_change(&tree, Some(&caret), &layout));
        assert!(!overlay.on_selection_change(&tree, None, &layout));
        assert_eq!(overlay.boxes().len(), 2);
    }

    #[test]
    fn test_blur_clears() {
        let (tree, range, layout) = setup();
        let mut overlay = HighlightOverlay::new();
        overlay.on_selection_change(&tree, Some(&range), &layout);
        overlay.on_blur();
        assert!(overlay.boxes().is_empty());
    }
}

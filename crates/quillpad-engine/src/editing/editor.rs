use log::{debug, info};
use serde_json::Value;

use crate::document::{DEFAULT_ROOT_TAG, DocumentTree, NodeId};
use crate::editing::formatting::{insert_block, insert_hyperlink, insert_image, toggle_inline};
use crate::editing::{BlockKind, Cmd, Patch, Position, SelectionRange, SelectionSlot};
use crate::highlight::{HighlightBox, HighlightOverlay};
use crate::layout::Layout;
use crate::media::{Action, MediaManipulator, PointerEvent, PointerTarget};
use crate::render::{RenderState, to_html};
use crate::serialization::{ClickRegistry, LoadReport, deserialize, hydrate, serialize};

pub const DEFAULT_MOVE_DEBOUNCE_MS: u64 = 10;
pub const DEFAULT_CROP_MIN_SIZE: f64 = 10.0;
pub const DEFAULT_IMAGE_STYLE: &str = "max-width: 100%; height: auto; cursor: pointer";

#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    /// Tag of the editable surface's root element
    pub root_tag: String,
    /// Window over which pointer moves are coalesced
    pub move_debounce_ms: u64,
    /// Smallest crop box width/height
    pub crop_min_size: f64,
    /// `style` given to newly inserted images
    pub image_style: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            move_debounce_ms: DEFAULT_MOVE_DEBOUNCE_MS,
            crop_min_size: DEFAULT_CROP_MIN_SIZE,
            image_style: DEFAULT_IMAGE_STYLE.to_string(),
        }
    }
}

/// One editable surface: the document plus everything transient around it
#[derive(Debug, Clone)]
pub struct Editor {
    tree: DocumentTree,
    selection: SelectionSlot,
    media: MediaManipulator,
    highlight: HighlightOverlay,
    clickable: ClickRegistry,
    options: EditorOptions,
    version: u64,
}

impl Editor {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            tree: DocumentTree::new(&options.root_tag),
            selection: SelectionSlot::new(),
            media: MediaManipulator::new(options.move_debounce_ms, options.crop_min_size),
            highlight: HighlightOverlay::new(),
            clickable: ClickRegistry::new(),
            options,
            version: 0,
        }
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Bumped on every document change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn media(&self) -> &MediaManipulator {
        &self.media
    }

    pub fn clickable_images(&self) -> &ClickRegistry {
        &self.clickable
    }

    pub fn highlights(&self) -> &[HighlightBox] {
        self.highlight.boxes()
    }

    // ============ Selection ============

    pub fn selection(&self) -> Option<SelectionRange> {
        self.selection.capture()
    }

    /// The host reports where its selection now is
    pub fn set_selection(&mut self, range: Option<SelectionRange>) {
        match range {
            Some(range) => self.selection.restore(range),
            None => self.selection.clear_active(),
        }
    }

    /// Remember the current selection before focus moves elsewhere
    pub fn save_selection(&mut self) -> bool {
        self.selection.save()
    }

    pub fn on_selection_change(&mut self, layout: &dyn Layout) -> bool {
        let range = self.selection.capture();
        self.highlight
            .on_selection_change(&self.tree, range.as_ref(), layout)
    }

    pub fn on_blur(&mut self) {
        self.highlight.on_blur();
    }

    // ============ Commands ============

    /// Run `cmd` against the saved (or else active) selection.
    ///
    /// Returns `None` when the command had nothing to act on; the document
    /// is then untouched.
    pub fn apply(&mut self, cmd: Cmd) -> Option<Patch> {
        if !cmd.needs_selection() {
            self.clear_document();
            return Some(self.commit(None));
        }

        let Some(range) = self.selection.restore_saved(&self.tree) else {
            debug!("{}: no selection", cmd.name());
            return None;
        };

        let caret = match &cmd {
            Cmd::ToggleInline { tag } => toggle_inline(&mut self.tree, &range, tag),
            Cmd::InsertHyperlink { href } => insert_hyperlink(&mut self.tree, &range, href),
            Cmd::InsertBlock { kind } => insert_block(&mut self.tree, &range, *kind),
            Cmd::InsertImage { source, alt } => insert_image(
                &mut self.tree,
                &range,
                source,
                alt.as_deref(),
                &self.options.image_style,
            )
            .map(|(image, caret)| {
                self.clickable.register(image);
                caret
            }),
            Cmd::Clear => None,
        };

        let Some(caret) = caret else {
            debug!("{}: nothing to do", cmd.name());
            return None;
        };
        Some(self.commit(Some(caret)))
    }

    pub fn toggle_inline(&mut self, tag: &str) -> bool {
        self.apply(Cmd::ToggleInline {
            tag: tag.to_string(),
        })
        .is_some()
    }

    pub fn insert_hyperlink(&mut self, href: &str) -> bool {
        self.apply(Cmd::InsertHyperlink {
            href: href.to_string(),
        })
        .is_some()
    }

    pub fn insert_block(&mut self, kind: BlockKind) -> bool {
        self.apply(Cmd::InsertBlock { kind }).is_some()
    }

    pub fn insert_image(&mut self, source: &str, alt: Option<&str>) -> bool {
        self.apply(Cmd::InsertImage {
            source: source.to_string(),
            alt: alt.map(str::to_string),
        })
        .is_some()
    }

    pub fn clear(&mut self) {
        self.apply(Cmd::Clear);
    }

    fn commit(&mut self, caret: Option<Position>) -> Patch {
        let new_selection = caret.map(SelectionRange::collapsed);
        if let Some(range) = new_selection {
            self.selection.restore(range);
        }

        self.clickable.retain_mounted(&self.tree);
        if let Some(image) = self.media.selected_image()
            && !self.tree.is_mounted(image)
        {
            self.media.cancel();
        }

        self.version += 1;
        Patch {
            new_selection,
            version: self.version,
        }
    }

    fn clear_document(&mut self) {
        let root = self.tree.root();
        self.tree.clear_children(root);
        self.selection.clear();
        self.highlight.on_blur();
        self.media.cancel();
        self.clickable.clear();
    }

    // ============ Images ============

    /// An image was clicked; registered images open the action chooser
    pub fn click(&mut self, target: NodeId) -> bool {
        if !self.clickable.is_registered(target) || !self.tree.is_mounted(target) {
            return false;
        }
        self.media.select_image(target);
        true
    }

    pub fn choose_image_action(&mut self, action: Action, layout: &dyn Layout) -> bool {
        self.media.choose(action, &self.tree, layout)
    }

    pub fn pointer_down(
        &mut self,
        layout: &dyn Layout,
        target: PointerTarget,
        event: PointerEvent,
    ) -> bool {
        if let PointerTarget::Image(image) = target
            && self.click(image)
        {
            return true;
        }
        self.media
            .pointer_down(&mut self.tree, layout, target, event)
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> bool {
        self.media.pointer_move(event)
    }

    /// Drive debounced work from the host's event loop
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let changed = self.media.tick(&mut self.tree, now_ms);
        if changed {
            self.version += 1;
        }
        changed
    }

    pub fn pointer_up(&mut self, target: PointerTarget, event: PointerEvent) -> bool {
        let image = self.media.selected_image();
        let before = self.image_style(image);
        let changed = self.media.pointer_up(&mut self.tree, target, event);
        if self.image_style(image) != before {
            self.version += 1;
        }
        changed
    }

    pub fn apply_crop(&mut self) -> bool {
        let applied = self.media.apply_crop(&mut self.tree);
        if applied {
            self.version += 1;
        }
        applied
    }

    fn image_style(&self, image: Option<NodeId>) -> Option<String> {
        image
            .and_then(|image| self.tree.attribute(image, "style"))
            .map(str::to_string)
    }

    // ============ Persistence ============

    /// Replace the document with the one described by `document`.
    ///
    /// Only the top-level `children` are read; the root keeps its own tag.
    /// Malformed nodes are skipped and counted in the report.
    pub fn load_from(&mut self, document: &Value) -> LoadReport {
        self.clear_document();
        let root = self.tree.root();
        let mut report = LoadReport::default();

        match document.get("children").and_then(Value::as_array) {
            Some(children) => {
                for child in children {
                    deserialize(&mut self.tree, child, root, &mut report);
                }
            }
            None => debug!("Document has no children array, loading it empty"),
        }

        hydrate(&self.tree, root, &mut self.clickable);
        self.version += 1;
        info!(
            "Loaded document: {} nodes, {} dropped",
            report.loaded, report.dropped
        );
        report
    }

    pub fn load_from_str(&mut self, json: &str) -> Result<LoadReport, serde_json::Error> {
        let document: Value = serde_json::from_str(json)?;
        Ok(self.load_from(&document))
    }

    pub fn serialize_current_document(&self) -> Value {
        serialize(&self.tree, self.tree.root())
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.serialize_current_document())
    }

    pub fn render_html(&self) -> String {
        let state = RenderState {
            selected_image: self.media.selected_image(),
        };
        to_html(&self.tree, self.tree.root(), &state)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

//! Direct manipulation of images: resize, drag and crop.
//!
//! One image is manipulated at a time. Selecting an image opens the action
//! chooser; the chosen action either arms resize/drag controls or starts a
//! crop session. Pointer moves are debounced, and the last move before
//! pointer-up always wins. Geometry is written to the image's `style`
//! attribute so it survives serialization.

use log::debug;

use crate::document::{DocumentTree, NodeId};
use crate::layout::Layout;
use crate::media::{Debouncer, Inset, Point, Rect, Size};

/// Smallest width/height a resize may produce
pub const MIN_IMAGE_SIZE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn includes_left(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn includes_right(&self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    pub fn includes_top(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    pub fn includes_bottom(&self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }
}

/// What the action chooser offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ResizeDrag,
    Crop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Shift held: lock the aspect ratio while resizing
    pub shift: bool,
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64, time_ms: u64) -> Self {
        Self {
            x,
            y,
            shift: false,
            time_ms,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// What a pointer-down or pointer-up landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Anywhere on the surface that is not one of the targets below
    Surface,
    Image(NodeId),
    Handle(Corner),
    DragHandle,
    CropOverlay,
    /// Manipulation UI that must not end a session (chooser buttons, toolbars)
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub origin: Point,
    pub start: Size,
    pub corner: Corner,
    pub lock_aspect: bool,
}

impl ResizeSession {
    /// Size for the pointer at `pointer`.
    ///
    /// Right/bottom corners grow with positive deltas, left/top corners with
    /// negative ones. With the aspect lock on, the dimension that moved
    /// relatively more wins and the other follows the start ratio.
    pub fn size_at(&self, pointer: Point) -> Size {
        let delta = pointer - self.origin;
        let mut width = self.start.width;
        let mut height = self.start.height;

        if self.corner.includes_right() {
            width += delta.x;
        }
        if self.corner.includes_left() {
            width -= delta.x;
        }
        if self.corner.includes_bottom() {
            height += delta.y;
        }
        if self.corner.includes_top() {
            height -= delta.y;
        }

        width = width.max(MIN_IMAGE_SIZE);
        height = height.max(MIN_IMAGE_SIZE);

        if self.lock_aspect && self.start.width > 0.0 && self.start.height > 0.0 {
            let ratio = self.start.width / self.start.height;
            if width / height > ratio {
                height = width / ratio;
            } else {
                width = height * ratio;
            }
        }

        Size::new(width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub origin: Point,
    /// Image offset within the container at press time
    pub start: Point,
}

impl DragSession {
    pub fn position_at(&self, pointer: Point) -> Point {
        self.start + (pointer - self.origin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CropPress {
    origin: Point,
    base: Size,
}

/// Crop box over an image, in container coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSession {
    pub image_rect: Rect,
    pub crop_box: Rect,
    press: Option<CropPress>,
}

impl CropSession {
    /// Start with the box covering the whole image
    pub fn new(image_rect: Rect) -> Self {
        Self {
            image_rect,
            crop_box: image_rect,
            press: None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    fn press(&mut self, at: Point) {
        self.press = Some(CropPress {
            origin: at,
            base: self.crop_box.size(),
        });
    }

    fn release(&mut self) {
        self.press = None;
    }

    /// Grow or shrink the box from its press-time size; the origin stays put
    fn track(&mut self, pointer: Point, min_size: f64) -> bool {
        let Some(press) = self.press else {
            return false;
        };
        let delta = pointer - press.origin;
        self.crop_box.width = (press.base.width + delta.x).max(min_size);
        self.crop_box.height = (press.base.height + delta.y).max(min_size);
        true
    }

    /// Clip region relative to the image's own edges, never negative
    pub fn clip(&self) -> Inset {
        let left = self.crop_box.left - self.image_rect.left;
        let top = self.crop_box.top - self.image_rect.top;
        Inset {
            top: top.max(0.0),
            right: (self.image_rect.width - (left + self.crop_box.width)).max(0.0),
            bottom: (self.image_rect.height - (top + self.crop_box.height)).max(0.0),
            left: left.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManipulationState {
    Idle,
    /// Image selected, action chooser open
    PendingAction { image: NodeId },
    /// Resize handles and drag handle shown, nothing pressed
    Armed { image: NodeId },
    Resizing { image: NodeId, session: ResizeSession },
    Dragging { image: NodeId, session: DragSession },
    Cropping { image: NodeId, session: CropSession },
}

impl ManipulationState {
    pub fn image(&self) -> Option<NodeId> {
        match self {
            ManipulationState::Idle => None,
            ManipulationState::PendingAction { image }
            | ManipulationState::Armed { image }
            | ManipulationState::Resizing { image, .. }
            | ManipulationState::Dragging { image, .. }
            | ManipulationState::Cropping { image, .. } => Some(*image),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ManipulationState::Idle => "idle",
            ManipulationState::PendingAction { .. } => "pending-action",
            ManipulationState::Armed { .. } => "armed",
            ManipulationState::Resizing { .. } => "resizing",
            ManipulationState::Dragging { .. } => "dragging",
            ManipulationState::Cropping { .. } => "cropping",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaManipulator {
    state: ManipulationState,
    moves: Debouncer<Point>,
    crop_min_size: f64,
}

impl MediaManipulator {
    pub fn new(move_debounce_ms: u64, crop_min_size: f64) -> Self {
        Self {
            state: ManipulationState::Idle,
            moves: Debouncer::new(move_debounce_ms),
            crop_min_size,
        }
    }

    pub fn state(&self) -> &ManipulationState {
        &self.state
    }

    pub fn selected_image(&self) -> Option<NodeId> {
        self.state.image()
    }

    pub fn chooser_open(&self) -> bool {
        matches!(self.state, ManipulationState::PendingAction { .. })
    }

    pub fn crop_box(&self) -> Option<Rect> {
        match &self.state {
            ManipulationState::Cropping { session, .. } => Some(session.crop_box),
            _ => None,
        }
    }

    pub fn has_pending_move(&self) -> bool {
        self.moves.is_pending()
    }

    /// Select `image` and open the action chooser, ending any other session
    pub fn select_image(&mut self, image: NodeId) {
        if self.state != ManipulationState::Idle {
            self.cancel();
        }
        debug!("Image {image} selected");
        self.state = ManipulationState::PendingAction { image };
    }

    /// Pick an action from the chooser
    pub fn choose(&mut self, action: Action, tree: &DocumentTree, layout: &dyn Layout) -> bool {
        let ManipulationState::PendingAction { image } = self.state else {
            return false;
        };
        if !tree.is_mounted(image) {
            self.cancel();
            return false;
        }

        match action {
            Action::ResizeDrag => {
                self.state = ManipulationState::Armed { image };
                true
            }
            Action::Crop => {
                let Some(rect) = layout.node_rect(image) else {
                    debug!("Image {image} has no layout, cannot crop");
                    return false;
                };
                let image_rect = rect.relative_to(&layout.container_rect());
                self.state = ManipulationState::Cropping {
                    image,
                    session: CropSession::new(image_rect),
                };
                true
            }
        }
    }

    /// Begin a press. Returns whether the state changed.
    pub fn pointer_down(
        &mut self,
        tree: &mut DocumentTree,
        layout: &dyn Layout,
        target: PointerTarget,
        event: PointerEvent,
    ) -> bool {
        if let Some(image) = self.state.image()
            && !tree.is_mounted(image)
        {
            self.cancel();
            return false;
        }

        match (self.state, target) {
            (ManipulationState::Armed { image }, PointerTarget::Handle(corner)) => {
                let Some(rect) = layout.node_rect(image) else {
                    return false;
                };
                self.state = ManipulationState::Resizing {
                    image,
                    session: ResizeSession {
                        origin: event.point(),
                        start: rect.size(),
                        corner,
                        lock_aspect: event.shift,
                    },
                };
                true
            }
            (ManipulationState::Armed { image }, PointerTarget::DragHandle) => {
                let Some(start) = layout.node_offset(image) else {
                    return false;
                };
                let mut style = tree.style(image);
                style.set("position", "absolute");
                style.set_px("left", start.x);
                style.set_px("top", start.y);
                tree.set_style(image, &style);
                self.state = ManipulationState::Dragging {
                    image,
                    session: DragSession {
                        origin: event.point(),
                        start,
                    },
                };
                true
            }
            (ManipulationState::Cropping { image, mut session }, PointerTarget::CropOverlay) => {
                session.press(event.point());
                self.state = ManipulationState::Cropping { image, session };
                true
            }
            _ => false,
        }
    }

    /// Queue a move; only the last one inside the debounce window is applied
    pub fn pointer_move(&mut self, event: PointerEvent) -> bool {
        let tracking = match &self.state {
            ManipulationState::Resizing { .. } | ManipulationState::Dragging { .. } => true,
            ManipulationState::Cropping { session, .. } => session.is_pressed(),
            _ => false,
        };
        if tracking {
            self.moves.schedule(event.point(), event.time_ms);
        }
        tracking
    }

    /// Apply a debounced move whose window has elapsed
    pub fn tick(&mut self, tree: &mut DocumentTree, now_ms: u64) -> bool {
        match self.moves.poll(now_ms) {
            Some(pointer) => self.apply_move(tree, pointer),
            None => false,
        }
    }

    /// End a press. The pending move is applied first.
    pub fn pointer_up(
        &mut self,
        tree: &mut DocumentTree,
        target: PointerTarget,
        _event: PointerEvent,
    ) -> bool {
        if target == PointerTarget::Control {
            return false;
        }
        if let Some(pointer) = self.moves.flush() {
            self.apply_move(tree, pointer);
        }

        match self.state {
            ManipulationState::Idle => false,
            // The release of the click that opened the chooser
            ManipulationState::PendingAction { image }
                if target == PointerTarget::Image(image) =>
            {
                false
            }
            ManipulationState::Cropping { image, mut session }
                if target == PointerTarget::CropOverlay =>
            {
                session.release();
                self.state = ManipulationState::Cropping { image, session };
                true
            }
            state => {
                debug!("Ending {} session", state.name());
                self.cancel();
                true
            }
        }
    }

    /// Write the crop box to the image as a `clip-path` and end the session
    pub fn apply_crop(&mut self, tree: &mut DocumentTree) -> bool {
        if let Some(pointer) = self.moves.flush() {
            self.apply_move(tree, pointer);
        }
        let ManipulationState::Cropping { image, session } = self.state else {
            return false;
        };

        let mut style = tree.style(image);
        style.set("clip-path", session.clip().to_string());
        let applied = tree.set_style(image, &style);
        self.cancel();
        applied
    }

    /// Drop any session and pending move, back to Idle
    pub fn cancel(&mut self) {
        self.moves.cancel();
        self.state = ManipulationState::Idle;
    }

    fn apply_move(&mut self, tree: &mut DocumentTree, pointer: Point) -> bool {
        let Some(image) = self.state.image() else {
            return false;
        };
        if !tree.is_mounted(image) {
            debug!("Image {image} was removed mid-session");
            self.cancel();
            return false;
        }

        match &mut self.state {
            ManipulationState::Resizing { session, .. } => {
                let size = session.size_at(pointer);
                let mut style = tree.style(image);
                style.set_px("width", size.width);
                style.set_px("height", size.height);
                tree.set_style(image, &style)
            }
            ManipulationState::Dragging { session, .. } => {
                let position = session.position_at(pointer);
                let mut style = tree.style(image);
                style.set("position", "absolute");
                style.set_px("left", position.x);
                style.set_px("top", position.y);
                tree.set_style(image, &style)
            }
            ManipulationState::Cropping { session, .. } => {
                session.track(pointer, self.crop_min_size)
            }
            _ => false,
        }
    }
}

//! Image handling: geometry types, the pointer-move debouncer, the
//! manipulation state machine and image ingestion.

pub mod debounce;
pub mod geometry;
pub mod ingest;
pub mod manipulator;

pub use debounce::Debouncer;
pub use geometry::{Inset, Point, Rect, Size};
pub use ingest::{IngestError, data_uri, mime_for_path};
pub use manipulator::{
    Action, Corner, CropSession, DragSession, MIN_IMAGE_SIZE, ManipulationState, MediaManipulator,
    PointerEvent, PointerTarget, ResizeSession,
};

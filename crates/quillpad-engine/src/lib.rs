pub mod document;
pub mod editing;
pub mod highlight;
pub mod io;
pub mod layout;
pub mod media;
pub mod render;
pub mod serialization;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use document::*;
pub use editing::*;
pub use highlight::{HighlightBox, HighlightOverlay};
pub use io::{DocumentStore, StoreError, load_into, save_from};
pub use layout::{Layout, StaticLayout};
pub use media::{
    Action, Corner, IngestError, ManipulationState, MediaManipulator, Point, PointerEvent,
    PointerTarget, Rect, Size,
};
pub use render::{RenderState, to_html};
pub use serialization::{ClickRegistry, HydrationHooks, LoadReport, deserialize, hydrate, serialize};

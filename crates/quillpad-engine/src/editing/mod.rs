/*!
 * # Editing Core
 *
 * Commands operate on the [`DocumentTree`](crate::document::DocumentTree)
 * through a selection, never on rendered markup. The host reports its
 * selection, the editor mutates the tree, and the surface is re-projected
 * from the model.
 *
 * ## Module Structure
 *
 * - **`selection`**: `Position`, `SelectionRange`, the active/saved
 *   `SelectionSlot`, range extraction and insertion
 * - **`formatting`**: inline toggling, hyperlinks, block and image insertion
 * - **`commands`**: `Cmd` enum accepted by `Editor::apply`
 * - **`patch`**: what a successful command changed
 * - **`editor`**: `Editor`, tying the tree to selection, media manipulation,
 *   highlighting and persistence
 *
 * ## Usage Pattern
 *
 * ```rust
 * use quillpad_engine::{Cmd, Editor, SelectionRange};
 *
 * let mut editor = Editor::default();
 * editor
 *     .load_from_str(r#"{"children":[{"type":"text","content":"hello world"}]}"#)
 *     .unwrap();
 *
 * let text = editor.tree().children(editor.tree().root())[0];
 * editor.set_selection(Some(SelectionRange::within_text(text, 6, 11)));
 * editor.apply(Cmd::bold());
 *
 * assert_eq!(editor.render_html(), "<div>hello <strong>world</strong></div>");
 * ```
 */

pub mod commands;
pub mod editor;
pub mod formatting;
pub mod patch;
pub mod selection;

pub use commands::Cmd;
pub use editor::{
    DEFAULT_CROP_MIN_SIZE, DEFAULT_IMAGE_STYLE, DEFAULT_MOVE_DEBOUNCE_MS, Editor, EditorOptions,
};
pub use formatting::BlockKind;
pub use patch::Patch;
pub use selection::{
    Extraction, Position, SelectionRange, SelectionSlot, compare_positions, extract_contents,
    insert_at,
};

//! End-to-end editing sessions driven the way a host surface drives them:
//! report a selection, fire a command, re-render.

use pretty_assertions::assert_eq;
use quillpad_engine::media::{Action, Corner, ManipulationState, PointerEvent, PointerTarget};
use quillpad_engine::{BlockKind, Cmd, Editor, Position, Rect, SelectionRange, StaticLayout};
use rstest::rstest;
use serde_json::json;

fn editor_with(content: &str) -> Editor {
    let mut editor = Editor::default();
    editor.load_from(&json!({"children": [{"type": "text", "content": content}]}));
    editor
}

fn first_child(editor: &Editor) -> quillpad_engine::NodeId {
    editor.tree().children(editor.tree().root())[0]
}

// ============ Inline formatting ============

#[rstest]
#[case("strong")]
#[case("em")]
#[case("u")]
fn toggling_twice_restores_text(#[case] tag: &str) {
    let mut editor = editor_with("hello world");
    let text = first_child(&editor);
    editor.set_selection(Some(SelectionRange::within_text(text, 6, 11)));
    assert!(editor.toggle_inline(tag));
    assert_eq!(
        editor.render_html(),
        format!("<div>hello <{tag}>world</{tag}></div>")
    );

    let root = editor.tree().root();
    let wrapper = editor.tree().children(root)[1];
    let inner = editor.tree().children(wrapper)[0];
    editor.set_selection(Some(SelectionRange::within_text(inner, 0, 5)));
    assert!(editor.toggle_inline(tag));

    assert_eq!(editor.render_html(), "<div>hello world</div>");
}

#[test]
fn toggle_collapses_caret_after_wrapper() {
    let mut editor = editor_with("hello world");
    let text = first_child(&editor);
    editor.set_selection(Some(SelectionRange::within_text(text, 0, 5)));

    let patch = editor.apply(Cmd::italic()).unwrap();
    let root = editor.tree().root();
    assert_eq!(
        patch.new_selection,
        Some(SelectionRange::collapsed(Position::new(root, 1)))
    );
    assert_eq!(editor.selection(), patch.new_selection);
}

#[test]
fn collapsed_selection_toggle_is_noop() {
    let mut editor = editor_with("hello");
    let text = first_child(&editor);
    editor.set_selection(Some(SelectionRange::collapsed(Position::new(text, 2))));

    assert!(editor.apply(Cmd::bold()).is_none());
    assert_eq!(editor.render_html(), "<div>hello</div>");
}

#[test]
fn formatted_document_reloads_without_loss() {
    let mut editor = editor_with("hello world");
    let text = first_child(&editor);
    editor.set_selection(Some(SelectionRange::within_text(text, 6, 11)));
    assert!(!editor.toggle_inline("mark"));
    assert!(editor.toggle_inline("em"));

    let saved = editor.serialize_current_document();
    let mut reloaded = Editor::default();
    assert!(reloaded.load_from(&saved).is_clean());
    assert_eq!(reloaded.render_html(), "<div>hello <em>world</em></div>");
}

// ============ Hyperlinks ============

#[test]
fn hyperlink_on_collapsed_selection_is_noop() {
    let mut editor = editor_with("link");
    let text = first_child(&editor);
    editor.set_selection(Some(SelectionRange::collapsed(Position::new(text, 4))));

    assert!(!editor.insert_hyperlink("https://example.test"));
    assert_eq!(editor.render_html(), "<div>link</div>");
}

#[test]
fn hyperlink_with_empty_href_is_noop() {
    let mut editor = editor_with("link");
    let text = first_child(&editor);
    editor.set_selection(Some(SelectionRange::within_text(text, 0, 4)));

    assert!(!editor.insert_hyperlink("   "));
    assert_eq!(editor.render_html(), "<div>link</div>");
}

// ============ Blocks ============

#[rstest]
#[case(BlockKind::H1, "<h1>New H1 Element</h1>")]
#[case(BlockKind::H3, "<h3>New H3 Element</h3>")]
#[case(BlockKind::OrderedList, "<ol><li>New Ordered List Item</li></ol>")]
#[case(BlockKind::UnorderedList, "<ul><li>New Unordered List Item</li></ul>")]
fn blocks_insert_at_caret(#[case] kind: BlockKind, #[case] markup: &str) {
    let mut editor = editor_with("ab");
    let text = first_child(&editor);
    editor.set_selection(Some(SelectionRange::collapsed(Position::new(text, 1))));

    assert!(editor.insert_block(kind));
    assert_eq!(editor.render_html(), format!("<div>a{markup}b</div>"));

    let root = editor.tree().root();
    let block = editor.tree().children(root)[1];
    let child_count = editor.tree().children(block).len();
    assert_eq!(
        editor.selection(),
        Some(SelectionRange::collapsed(Position::new(block, child_count)))
    );
}

// ============ Images ============

#[test]
fn inserted_image_can_be_cropped() {
    let mut editor = editor_with("photo: ");
    let text = first_child(&editor);
    editor.set_selection(Some(SelectionRange::collapsed(Position::new(text, 7))));
    assert!(editor.apply(Cmd::InsertImage {
        source: "data:image/png;base64,aGk=".to_string(),
        alt: None,
    })
    .is_some());

    let root = editor.tree().root();
    let image = editor.tree().children(root)[1];
    let layout = StaticLayout::new(Rect::new(0.0, 0.0, 640.0, 480.0))
        .with_node(image, Rect::new(50.0, 10.0, 200.0, 100.0));

    assert!(editor.pointer_down(&layout, PointerTarget::Image(image), PointerEvent::at(60.0, 20.0, 0)));
    assert!(editor.choose_image_action(Action::Crop, &layout));
    assert!(editor.pointer_down(&layout, PointerTarget::CropOverlay, PointerEvent::at(250.0, 110.0, 10)));
    editor.pointer_move(PointerEvent::at(200.0, 80.0, 11));
    editor.pointer_move(PointerEvent::at(190.0, 70.0, 12));
    assert!(editor.tick(30));
    assert!(editor.apply_crop());

    assert_eq!(*editor.media().state(), ManipulationState::Idle);
    assert_eq!(
        editor.tree().style(image).get("clip-path"),
        Some("inset(0px 60px 40px 0px)")
    );
}

#[test]
fn shift_resize_keeps_aspect_ratio() {
    let mut editor = Editor::default();
    editor.load_from(&json!({"children": [
        {"type": "img", "attributes": {"src": "a.png"}}
    ]}));
    let image = first_child(&editor);
    let layout = StaticLayout::new(Rect::new(0.0, 0.0, 640.0, 480.0))
        .with_node(image, Rect::new(0.0, 0.0, 160.0, 90.0));

    editor.pointer_down(&layout, PointerTarget::Image(image), PointerEvent::at(1.0, 1.0, 0));
    editor.choose_image_action(Action::ResizeDrag, &layout);
    let handle = PointerTarget::Handle(Corner::BottomRight);
    editor.pointer_down(&layout, handle, PointerEvent::at(160.0, 90.0, 1).with_shift());
    editor.pointer_move(PointerEvent::at(320.0, 100.0, 2).with_shift());
    editor.pointer_up(PointerTarget::Surface, PointerEvent::at(320.0, 100.0, 3));

    let style = editor.tree().style(image);
    let width = style.px("width").unwrap();
    let height = style.px("height").unwrap();
    assert_eq!(width, 320.0);
    assert_eq!(height, 180.0);
}

#[test]
fn image_click_release_leaves_chooser_open() {
    let mut editor = Editor::default();
    editor.load_from(&json!({"children": [
        {"type": "img", "attributes": {"src": "a.png"}}
    ]}));
    let image = first_child(&editor);
    let layout = StaticLayout::new(Rect::new(0.0, 0.0, 640.0, 480.0))
        .with_node(image, Rect::new(0.0, 0.0, 160.0, 90.0));

    assert!(editor.pointer_down(&layout, PointerTarget::Image(image), PointerEvent::at(5.0, 5.0, 0)));
    editor.pointer_up(PointerTarget::Image(image), PointerEvent::at(5.0, 5.0, 40));

    assert!(editor.media().chooser_open());
    assert!(editor.choose_image_action(Action::ResizeDrag, &layout));
    assert_eq!(*editor.media().state(), ManipulationState::Armed { image });
}

#[test]
fn removing_image_mid_drag_returns_to_idle() {
    let mut editor = Editor::default();
    editor.load_from(&json!({"children": [
        {"type": "p", "children": [
            {"type": "text", "content": "x"},
            {"type": "img", "attributes": {"src": "a.png"}}
        ]}
    ]}));
    let paragraph = first_child(&editor);
    let text = editor.tree().children(paragraph)[0];
    let image = editor.tree().children(paragraph)[1];
    let layout = StaticLayout::new(Rect::new(0.0, 0.0, 640.0, 480.0))
        .with_node(image, Rect::new(10.0, 0.0, 20.0, 20.0));

    editor.pointer_down(&layout, PointerTarget::Image(image), PointerEvent::at(11.0, 1.0, 0));
    editor.choose_image_action(Action::ResizeDrag, &layout);
    editor.pointer_down(&layout, PointerTarget::DragHandle, PointerEvent::at(11.0, 1.0, 1));
    editor.pointer_move(PointerEvent::at(40.0, 1.0, 2));

    // Unwrapping the paragraph flattens it to text, dropping the image
    editor.set_selection(Some(SelectionRange::new(
        Position::new(text, 0),
        Position::new(paragraph, 2),
    )));
    editor.apply(Cmd::ToggleInline {
        tag: "p".to_string(),
    });

    assert!(!editor.tree().is_mounted(image));
    assert!(!editor.tick(100));
    assert_eq!(*editor.media().state(), ManipulationState::Idle);
}

// ============ Clear ============

#[test]
fn clear_empties_document() {
    let mut editor = editor_with("gone soon");
    editor.apply(Cmd::Clear).unwrap();
    assert!(editor.tree().is_empty());
    assert_eq!(
        editor.serialize_current_document(),
        json!({"type": "div", "attributes": {}, "children": []})
    );
}

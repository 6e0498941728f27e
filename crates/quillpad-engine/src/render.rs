//! HTML projection of the document, rebuilt from the model on every change.

use crate::document::{DocumentTree, NodeId, NodeKind};

/// Elements written without a closing tag
pub const VOID_TAGS: &[&str] = &["img", "br"];

pub const SELECTED_CLASS: &str = "selected";

/// Transient view state layered onto the markup, never stored in the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    pub selected_image: Option<NodeId>,
}

pub fn to_html(tree: &DocumentTree, id: NodeId, state: &RenderState) -> String {
    let mut out = String::new();
    write_node(tree, id, state, &mut out);
    out
}

fn write_node(tree: &DocumentTree, id: NodeId, state: &RenderState, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    match node.kind() {
        NodeKind::Text { content } => {
            out.push_str(&html_escape::encode_text(content));
        }
        NodeKind::Element {
            tag,
            attributes,
            children,
        } => {
            let selected = state.selected_image == Some(id);
            out.push('<');
            out.push_str(tag);

            let mut wrote_class = false;
            for (name, value) in attributes.iter() {
                if selected && name == "class" {
                    let merged = format!("{value} {SELECTED_CLASS}");
                    write_attribute(out, name, merged.trim_start());
                    wrote_class = true;
                } else {
                    write_attribute(out, name, value);
                }
            }
            if selected && !wrote_class {
                write_attribute(out, "class", SELECTED_CLASS);
            }

            if VOID_TAGS.contains(&tag.as_str()) {
                out.push('>');
                return;
            }
            out.push('>');
            for child in children {
                write_node(tree, *child, state, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}

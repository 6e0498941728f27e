//! Persisted JSON form of the document.
//!
//! ```json
//! {"type": "p", "attributes": {"class": "lead"}, "children": [
//!     {"type": "text", "content": "Hello"}
//! ]}
//! ```
//!
//! Loading is forgiving: a malformed node is dropped (with its subtree) and
//! counted, and its siblings still load.

pub mod hydrate;

use log::warn;
use serde_json::{Map, Value, json};

use crate::document::{Attributes, DocumentTree, NodeId, NodeKind, normalize_tag};

pub use hydrate::{ClickRegistry, HydrationHooks, hydrate};

pub const TEXT_TYPE: &str = "text";

/// Element tags accepted when loading, besides the tree's own root tag
pub const SUPPORTED_TAGS: &[&str] = &[
    "a",
    "b",
    "blockquote",
    "br",
    "code",
    "div",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "i",
    "img",
    "li",
    "ol",
    "p",
    "pre",
    "s",
    "span",
    "strong",
    "sub",
    "sup",
    "u",
    "ul",
];

pub fn is_supported_tag(tree: &DocumentTree, tag: &str) -> bool {
    SUPPORTED_TAGS.contains(&tag) || tree.tag(tree.root()) == Some(tag)
}

/// Outcome of a load: nodes created and malformed nodes skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub dropped: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.dropped == 0
    }
}

/// Serialize the subtree at `id`; `Value::Null` for an unknown id
pub fn serialize(tree: &DocumentTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };

    match node.kind() {
        NodeKind::Text { content } => json!({
            "type": TEXT_TYPE,
            "content": content,
        }),
        NodeKind::Element {
            tag,
            attributes,
            children,
        } => {
            let attributes: Map<String, Value> = attributes
                .iter()
                .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
                .collect();
            let children: Vec<Value> = children.iter().map(|child| serialize(tree, *child)).collect();
            json!({
                "type": tag,
                "attributes": attributes,
                "children": children,
            })
        }
    }
}

/// Build the node described by `value` and append it to `parent`.
///
/// Returns the new node, or `None` when the value was dropped.
pub fn deserialize(
    tree: &mut DocumentTree,
    value: &Value,
    parent: NodeId,
    report: &mut LoadReport,
) -> Option<NodeId> {
    let id = match build(tree, value, report) {
        Ok(id) => id,
        Err(reason) => {
            warn!("Dropping malformed node: {reason}");
            report.dropped += 1;
            return None;
        }
    };

    if !tree.append_child(parent, id) {
        warn!("Dropping node that {parent} cannot hold");
        tree.remove(id);
        report.dropped += 1;
        return None;
    }
    Some(id)
}

fn build(tree: &mut DocumentTree, value: &Value, report: &mut LoadReport) -> Result<NodeId, String> {
    let object = value.as_object().ok_or("not an object")?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or("missing string 'type'")?;

    if kind == TEXT_TYPE {
        let content = object
            .get("content")
            .and_then(Value::as_str)
            .ok_or("text node without string 'content'")?;
        report.loaded += 1;
        return Ok(tree.create_text(content));
    }

    let tag = normalize_tag(kind).ok_or("empty 'type'")?;
    if !is_supported_tag(tree, &tag) {
        return Err(format!("unsupported tag '{tag}'"));
    }
    let attributes = parse_attributes(object.get("attributes"))?;
    if tag == "img" && !attributes.contains("src") {
        return Err("img without 'src'".to_string());
    }
    let children = match object.get("children") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(_) => return Err(format!("'children' of {tag} is not an array")),
    };

    let element = tree.create_element(&tag).ok_or("empty 'type'")?;
    for (name, value) in attributes.iter() {
        tree.set_attribute(element, name, value);
    }
    report.loaded += 1;

    let accepts = tree.get(element).is_some_and(|node| node.accepts_children());
    if accepts {
        for child in children {
            deserialize(tree, child, element, report);
        }
    }
    Ok(element)
}

fn parse_attributes(value: Option<&Value>) -> Result<Attributes, String> {
    let map = match value {
        None | Some(Value::Null) => return Ok(Attributes::new()),
        Some(Value::Object(map)) => map,
        Some(_) => return Err("'attributes' is not an object".to_string()),
    };

    map.iter()
        .map(|(name, value)| match value {
            Value::String(text) => Ok((name.clone(), text.clone())),
            _ => Err(format!("attribute '{name}' is not a string")),
        })
        .collect()
}

//! Shared fixtures for unit tests.

use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;

pub fn create_test_store_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Heading, formatted paragraph, list and image
pub fn sample_document() -> Value {
    json!({
        "type": "div",
        "attributes": {},
        "children": [
            {"type": "h1", "attributes": {}, "children": [
                {"type": "text", "content": "Shopping"}
            ]},
            {"type": "p", "attributes": {}, "children": [
                {"type": "text", "content": "Buy "},
                {"type": "strong", "attributes": {}, "children": [
                    {"type": "text", "content": "bread"}
                ]},
                {"type": "text", "content": " today"}
            ]},
            {"type": "ul", "attributes": {}, "children": [
                {"type": "li", "attributes": {}, "children": [
                    {"type": "text", "content": "milk"}
                ]}
            ]},
            {"type": "img", "attributes": {"src": "data:image/png;base64,aGk=", "alt": "logo"}, "children": []}
        ]
    })
}

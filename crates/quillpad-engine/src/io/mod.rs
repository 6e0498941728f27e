use anyhow::Context;
use relative_path::RelativePathBuf;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::Editor;
use crate::serialization::LoadReport;

pub const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document key: {0:?}")]
    InvalidKey(String),
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized documents kept as `<root>/<key>.json`
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw JSON text stored under `key`, `None` when nothing was saved yet
    pub fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        log::info!("Loaded document '{key}' from {}", path.display());
        Ok(Some(content))
    }

    pub fn load_json(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.load(key)? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    /// Write `document` under `key` as pretty JSON
    pub fn save(&self, key: &str, document: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(document)?)?;
        log::info!("Saved document '{key}' to {}", path.display());
        Ok(())
    }

    /// Keys of every stored document, sorted
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file()
                && path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
                && is_valid_key(stem)
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let relative = RelativePathBuf::from(format!("{key}.{DOCUMENT_EXTENSION}"));
        Ok(relative.to_path(&self.root))
    }
}

/// Load the document stored under `key` into `editor`.
/// `Ok(None)` when nothing is stored, leaving the editor untouched.
pub fn load_into(
    editor: &mut Editor,
    store: &DocumentStore,
    key: &str,
) -> anyhow::Result<Option<LoadReport>> {
    let document = store
        .load_json(key)
        .with_context(|| format!("Failed to load document '{key}'"))?;
    Ok(document.map(|document| editor.load_from(&document)))
}

/// Save the editor's current document under `key`
pub fn save_from(editor: &Editor, store: &DocumentStore, key: &str) -> anyhow::Result<()> {
    store
        .save(key, &editor.serialize_current_document())
        .with_context(|| format!("Failed to save document '{key}'"))
}

/// Keys are single file-name-safe segments
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_store_dir, sample_document};
    use rstest::rstest;

    #[test]
    fn test_save_then_load() {
        let dir = create_test_store_dir();
        let store = DocumentStore::new(dir.path().join("nested"));

        store.save("editorJSON", &sample_document()).unwrap();
        let loaded = store.load_json("editorJSON").unwrap();
        assert_eq!(loaded, Some(sample_document()));
    }

    #[test]
    fn test_missing_document_is_none() {
        let dir = create_test_store_dir();
        let store = DocumentStore::new(dir.path());
        assert!(store.load("absent").unwrap().is_none());
    }

    #[rstest]
    #[case("")]
    #[case("../escape")]
    #[case("a/b")]
    #[case(".hidden")]
    #[case("spaced key")]
    fn test_invalid_keys(#[case] key: &str) {
        let dir = create_test_store_dir();
        let store = DocumentStore::new(dir.path());
        assert!(matches!(store.load(key), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_keys_lists_json_documents() {
        let dir = create_test_store_dir();
        create_test_file(&dir, "b.json", "{}");
        create_test_file(&dir, "a.json", "{}");
        create_test_file(&dir, "notes.txt", "ignored");

        let store = DocumentStore::new(dir.path());
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_editor_round_trip_through_store() {
        let dir = create_test_store_dir();
        let store = DocumentStore::new(dir.path());
        let mut editor = Editor::default();
        assert!(load_into(&mut editor, &store, "editorJSON").unwrap().is_none());

        editor.load_from(&sample_document());
        save_from(&editor, &store, "editorJSON").unwrap();

        let mut reloaded = Editor::default();
        let report = load_into(&mut reloaded, &store, "editorJSON").unwrap().unwrap();
        assert!(report.is_clean());
        assert_eq!(reloaded.serialize_current_document(), sample_document());
    }

    #[test]
    fn test_corrupt_json_reports_error() {
        let dir = create_test_store_dir();
        create_test_file(&dir, "broken.json", "{not json");

        let store = DocumentStore::new(dir.path());
        assert!(store.load("broken").unwrap().is_some());
        assert!(matches!(store.load_json("broken"), Err(StoreError::Json(_))));
    }
}

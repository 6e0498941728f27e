use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DOCUMENT_KEY: &str = "editorJSON";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the stored documents
    pub documents_path: PathBuf,
    /// Key the current document is saved under
    #[serde(default = "default_document_key")]
    pub document_key: String,
    #[serde(default)]
    pub editor: EditorSettings,
}

/// Editor tuning; every field may be left out of the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub root_tag: String,
    pub move_debounce_ms: u64,
    pub crop_min_size: f64,
    pub image_style: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            root_tag: "div".to_string(),
            move_debounce_ms: 10,
            crop_min_size: 10.0,
            image_style: "max-width: 100%; height: auto; cursor: pointer".to_string(),
        }
    }
}

fn default_document_key() -> String {
    DEFAULT_DOCUMENT_KEY.to_string()
}

impl Config {
    pub fn new(documents_path: impl Into<PathBuf>) -> Self {
        Self {
            documents_path: documents_path.into(),
            document_key: default_document_key(),
            editor: EditorSettings::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the documents path
        config.documents_path =
            Self::expand_path(&config.documents_path).unwrap_or(config.documents_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/quillpad");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

//! Optional per-directory configuration for bundling runs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use crate::asset_paths::validate_images_dir_name;

/// File looked up next to the document when no explicit configuration is given.
pub const DEFAULT_CONFIG_FILE: &str = "md_bundler.config.json";

/// Settings controlling how a document is bundled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackConfig {
    /// Folder, inside the bundle, that receives copied images.
    pub images_dir: String,
    /// Whether to write `<stem>.zip` next to the document.
    pub create_archive: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".into(),
            create_archive: true,
        }
    }
}

impl PackConfig {
    /// Load configuration from the document's directory.
    ///
    /// A missing, malformed or invalid file falls back to defaults so that bundling still
    /// works with no setup at all.
    pub fn discover(document_dir: &Path) -> Self {
        let candidate = document_dir.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(err) => {
                    warn!("ignoring {}: {err}", candidate.display());
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Read configuration from a specific JSON file, if it exists and parses.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Read configuration from a file the user asked for explicitly; failures are errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings that would place images outside of the bundle.
    pub fn validate(&self) -> Result<()> {
        validate_images_dir_name(&self.images_dir)
    }
}

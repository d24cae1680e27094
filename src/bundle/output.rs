//! Create the bundle's output tree and write the rewritten document into it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Create the images folder, and every missing parent, for a bundle.
pub fn prepare_output_tree(assets_dir: &Path) -> Result<()> {
  fs::create_dir_all(assets_dir)
    .with_context(|| format!("failed to create {}", assets_dir.display()))
}

/// Write the rewritten document text as UTF-8.
pub fn write_document(target: &Path, text: &str) -> Result<()> {
  fs::write(target, text).with_context(|| format!("failed to write {}", target.display()))
}

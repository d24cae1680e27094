//! Filesystem layout of a bundled document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::asset_paths::validate_images_dir_name;

/// Where a document's bundle is assembled, derived from the document path.
///
/// For `notes/trip.md` the bundle lives in `notes/trip/` (holding `trip.md` and the images
/// folder) and the archive is written to `notes/trip.zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackLayout {
  /// Absolute path of the source document.
  pub document_path: PathBuf,
  /// Directory containing the source document; relative references resolve against it.
  pub document_dir: PathBuf,
  /// Document file name without its extension.
  pub document_stem: String,
  /// Folder name for copied images inside the bundle.
  pub images_dir_name: String,
  /// `<document_dir>/<stem>`
  pub output_dir: PathBuf,
  /// `<output_dir>/<images_dir_name>`
  pub assets_dir: PathBuf,
  /// `<output_dir>/<original file name>`
  pub rewritten_document: PathBuf,
  /// `<document_dir>/<stem>.zip`
  pub archive_path: PathBuf,
}

impl PackLayout {
  /// Derive the bundle layout for `document`, which must exist.
  ///
  /// `images_dir_name` must be a relative folder inside the bundle.
  pub fn for_document(document: &Path, images_dir_name: &str) -> Result<Self> {
    validate_images_dir_name(images_dir_name)?;
    let document_path = fs::canonicalize(document)
      .with_context(|| format!("failed to locate {}", document.display()))?;
    let document_dir = document_path
      .parent()
      .ok_or_else(|| anyhow!("{} has no parent directory", document_path.display()))?
      .to_path_buf();
    let file_name = document_path
      .file_name()
      .ok_or_else(|| anyhow!("{} has no file name", document_path.display()))?
      .to_os_string();
    let document_stem = document_path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .ok_or_else(|| anyhow!("{} has no file stem", document_path.display()))?;

    let output_dir = document_dir.join(&document_stem);
    let assets_dir = output_dir.join(images_dir_name);
    let rewritten_document = output_dir.join(&file_name);
    let archive_path = document_dir.join(format!("{document_stem}.zip"));

    Ok(Self {
      document_path,
      document_dir,
      document_stem,
      images_dir_name: images_dir_name.to_string(),
      output_dir,
      assets_dir,
      rewritten_document,
      archive_path,
    })
  }
}

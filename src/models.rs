//! Data structures produced while bundling a markdown document.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Syntax an image reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
  /// `![alt](path "title")`
  Markdown,
  /// `<img src="path" ...>`
  Html,
}

/// Classification of a raw image location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
  /// `http://` or `https://` reference that is passed through untouched.
  Remote,
  /// Local reference whose target could not be found on disk.
  Missing {
    /// The decoded location that failed to resolve.
    raw: String,
  },
  /// Local file, fully resolved.
  Local(PathBuf),
}

/// How an asset ended up inside the images folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlacementKind {
  /// Bytes were copied into a free slot.
  Copied,
  /// An identical file already occupied the slot and was reused.
  Reused,
}

/// Result of placing a single local image into the images folder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedAsset {
  /// Resolved source file.
  pub source: PathBuf,
  /// File name chosen inside the images folder.
  pub file_name: String,
  /// Forward-slash path used in the rewritten reference, e.g. `images/pic_1.png`.
  pub bundle_path: String,
  /// Whether the file was copied or an identical copy reused.
  pub placement: PlacementKind,
}

/// Serializable summary of a completed bundling run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackSummary {
  /// Directory holding the rewritten document and its images.
  pub output_dir: PathBuf,
  /// Path of the rewritten document.
  pub document: PathBuf,
  /// Archive path, when one was written.
  pub archive: Option<PathBuf>,
  /// Number of files stored in the archive.
  pub archive_entries: usize,
  /// Every local reference that was rewritten, in document order.
  pub placed: Vec<PlacedAsset>,
  /// Local references that could not be found and were left unchanged.
  pub missing: Vec<String>,
  /// Count of remote references passed through.
  pub remote: usize,
}

impl PackSummary {
  /// Number of files actually copied during the run.
  pub fn copied_count(&self) -> usize {
    self
      .placed
      .iter()
      .filter(|asset| asset.placement == PlacementKind::Copied)
      .count()
  }
}

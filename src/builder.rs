//! Bundle orchestrator: rewrite a document, collect its images and archive the result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::bundle::archive::write_archive;
use crate::bundle::output::{prepare_output_tree, write_document};
use crate::config::PackConfig;
use crate::models::PackSummary;
use crate::project::PackLayout;
use crate::references::{ReferenceRewriter, RewriteOutcome};

/// Everything produced by a bundling run.
#[derive(Debug, Clone)]
pub struct PackArtifacts {
  /// Layout the bundle was written to.
  pub layout: PackLayout,
  /// Rewritten text and per-reference results.
  pub outcome: RewriteOutcome,
  /// Number of archive entries, or `None` when archiving was disabled.
  pub archive_entries: Option<usize>,
}

impl PackArtifacts {
  /// Serializable view of the run for reporting.
  pub fn summary(&self) -> PackSummary {
    PackSummary {
      output_dir: self.layout.output_dir.clone(),
      document: self.layout.rewritten_document.clone(),
      archive: self
        .archive_entries
        .map(|_| self.layout.archive_path.clone()),
      archive_entries: self.archive_entries.unwrap_or(0),
      placed: self.outcome.placed.clone(),
      missing: self.outcome.missing.clone(),
      remote: self.outcome.remote,
    }
  }
}

/// High-level helper that turns one markdown document into a self-contained bundle.
pub struct PackBuilder {
  layout: PackLayout,
  config: PackConfig,
}

impl PackBuilder {
  /// Create a builder for an already derived layout.
  pub fn new(layout: PackLayout, config: PackConfig) -> Self {
    Self { layout, config }
  }

  /// Derive the layout for `document` using `config` and create a builder for it.
  pub fn for_document(document: &Path, config: PackConfig) -> Result<Self> {
    let layout = PackLayout::for_document(document, &config.images_dir)?;
    Ok(Self::new(layout, config))
  }

  /// Run the bundle: create the output tree, rewrite and write the document, then archive.
  ///
  /// Nothing already written is rolled back when a later step fails.
  pub fn build(&self) -> Result<PackArtifacts> {
    let layout = &self.layout;
    prepare_output_tree(&layout.assets_dir)?;

    let original = fs::read_to_string(&layout.document_path)
      .with_context(|| format!("failed to read {}", layout.document_path.display()))?;

    let rewriter = ReferenceRewriter::new(
      &layout.document_dir,
      &layout.assets_dir,
      layout.images_dir_name.as_str(),
    )?;
    let outcome = rewriter.rewrite(&original)?;
    info!(
      "rewrote {} image reference(s), {} missing, {} remote",
      outcome.placed.len(),
      outcome.missing.len(),
      outcome.remote
    );

    write_document(&layout.rewritten_document, &outcome.text)?;

    let archive_entries = if self.config.create_archive {
      let entries = write_archive(&layout.output_dir, &layout.document_dir, &layout.archive_path)?;
      info!("archived {} file(s) into {}", entries, layout.archive_path.display());
      Some(entries)
    } else {
      None
    };

    Ok(PackArtifacts {
      layout: layout.clone(),
      outcome,
      archive_entries,
    })
  }
}

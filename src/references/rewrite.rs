//! Splice relocated image references back into the document text.

use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use super::{ImageReference, scan_html_images, scan_markdown_images};
use crate::asset_paths::{resolve_reference, validate_images_dir_name};
use crate::models::{PlacedAsset, ResolvedSource};
use crate::placement::place_asset;

/// Text produced by a rewrite together with what happened to each reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Rewritten document text.
    pub text: String,
    /// Local references that were relocated, in processing order.
    pub placed: Vec<PlacedAsset>,
    /// Locations of local references that could not be found; left unchanged.
    pub missing: Vec<String>,
    /// Number of remote references passed through unchanged.
    pub remote: usize,
}

/// Rewrites every image reference in a document to point into its bundle's images folder.
#[derive(Debug, Clone)]
pub struct ReferenceRewriter {
    document_dir: PathBuf,
    assets_dir: PathBuf,
    images_dir_name: String,
}

impl ReferenceRewriter {
    /// Create a rewriter for a document living in `document_dir`, copying images into
    /// `assets_dir`, which the rewritten document reaches as `images_dir_name`.
    ///
    /// Fails when `images_dir_name` is empty, absolute or climbs out with `..`.
    pub fn new(
        document_dir: impl Into<PathBuf>,
        assets_dir: impl Into<PathBuf>,
        images_dir_name: impl Into<String>,
    ) -> Result<Self> {
        let images_dir_name = images_dir_name.into();
        validate_images_dir_name(&images_dir_name)?;
        Ok(Self {
            document_dir: document_dir.into(),
            assets_dir: assets_dir.into(),
            images_dir_name,
        })
    }

    /// Rewrite markdown image references first, then HTML `<img>` tags in the result.
    ///
    /// Text outside of relocated references is carried over byte for byte. Remote and missing
    /// images keep their original reference. I/O failures while copying abort the rewrite.
    pub fn rewrite(&self, text: &str) -> Result<RewriteOutcome> {
        let mut outcome = RewriteOutcome::default();

        let markdown_pass = self.rewrite_pass(text, scan_markdown_images(text), &mut outcome)?;
        let html_pass =
            self.rewrite_pass(&markdown_pass, scan_html_images(&markdown_pass), &mut outcome)?;

        outcome.text = html_pass;
        Ok(outcome)
    }

    fn rewrite_pass<R: ImageReference>(
        &self,
        text: &str,
        references: Vec<R>,
        outcome: &mut RewriteOutcome,
    ) -> Result<String> {
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;

        for reference in references {
            let span = reference.span();
            output.push_str(&text[cursor..span.start]);

            match self.relocate(&reference, outcome)? {
                Some(new_path) => output.push_str(&reference.render(&new_path)),
                None => output.push_str(&text[span.clone()]),
            }

            cursor = span.end;
        }

        output.push_str(&text[cursor..]);
        Ok(output)
    }

    fn relocate<R: ImageReference>(
        &self,
        reference: &R,
        outcome: &mut RewriteOutcome,
    ) -> Result<Option<String>> {
        match resolve_reference(reference.location(), &self.document_dir) {
            ResolvedSource::Remote => {
                outcome.remote += 1;
                Ok(None)
            }
            ResolvedSource::Missing { raw } => {
                outcome.missing.push(raw);
                Ok(None)
            }
            ResolvedSource::Local(source) => {
                let placed = place_asset(&source, &self.assets_dir, &self.images_dir_name)?;
                debug!(
                    "{:?} reference {} -> {}",
                    reference.kind(),
                    reference.location(),
                    placed.bundle_path
                );
                let new_path = placed.bundle_path.clone();
                outcome.placed.push(placed);
                Ok(Some(new_path))
            }
        }
    }
}

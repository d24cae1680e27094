//! Locating, decomposing and rewriting image references inside a markdown document.

mod html;
mod markdown;
mod rewrite;

use std::ops::Range;

use crate::models::ReferenceKind;

pub use html::{HtmlImage, scan_html_images};
pub use markdown::{MarkdownImage, scan_markdown_images, split_destination};
pub use rewrite::{ReferenceRewriter, RewriteOutcome};

/// Common view over the two supported image reference syntaxes.
pub trait ImageReference {
    /// Syntax the reference was written in.
    fn kind(&self) -> ReferenceKind;

    /// Byte range of the full reference within the scanned text.
    fn span(&self) -> Range<usize>;

    /// Raw location the reference points at, before any decoding.
    fn location(&self) -> &str;

    /// Rebuild the reference so that it points at `new_path`, keeping everything else.
    fn render(&self, new_path: &str) -> String;
}

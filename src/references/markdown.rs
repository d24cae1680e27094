//! Scanner for markdown image references: `![alt](path "title")`.

use std::ops::Range;

use super::ImageReference;
use crate::models::ReferenceKind;

/// A located `![alt](inner)` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownImage<'a> {
    /// Byte range of the whole reference in the scanned text.
    pub span: Range<usize>,
    /// Text between the brackets; may be empty.
    pub alt: &'a str,
    /// Everything between the parentheses, unparsed.
    pub raw_inner: &'a str,
    /// Location portion of `raw_inner`.
    pub url_part: String,
    /// Title portion of `raw_inner` without its enclosing quotes; empty when absent.
    pub title_part: String,
}

impl ImageReference for MarkdownImage<'_> {
    fn kind(&self) -> ReferenceKind {
        ReferenceKind::Markdown
    }

    fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    fn location(&self) -> &str {
        &self.url_part
    }

    fn render(&self, new_path: &str) -> String {
        if self.title_part.is_empty() {
            format!("![{}]({})", self.alt, new_path)
        } else {
            format!("![{}]({} \"{}\")", self.alt, new_path, self.title_part)
        }
    }
}

/// Find every markdown image reference in `text`, left to right and non-overlapping.
///
/// The alt text runs to the first `]` and the destination to the first `)`, so neither may
/// contain its closing delimiter.
pub fn scan_markdown_images(text: &str) -> Vec<MarkdownImage<'_>> {
    let mut images = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find("![") {
        let start = cursor + offset;
        match parse_markdown_image(text, start) {
            Some(image) => {
                cursor = image.span.end;
                images.push(image);
            }
            None => cursor = start + 1,
        }
    }

    images
}

fn parse_markdown_image(text: &str, start: usize) -> Option<MarkdownImage<'_>> {
    let alt_start = start + 2;
    let alt_end = alt_start + text[alt_start..].find(']')?;
    if text.as_bytes().get(alt_end + 1) != Some(&b'(') {
        return None;
    }

    let inner_start = alt_end + 2;
    let inner_end = inner_start + text[inner_start..].find(')')?;
    let raw_inner = &text[inner_start..inner_end];
    let (url_part, title_part) = split_destination(raw_inner);

    Some(MarkdownImage {
        span: start..inner_end + 1,
        alt: &text[alt_start..alt_end],
        raw_inner,
        url_part,
        title_part,
    })
}

/// Split the inside of `(...)` into its location and optional title.
///
/// The first double quote starts the title, so a location that itself contains a double quote
/// is cut at that quote.
pub fn split_destination(inner: &str) -> (String, String) {
    let inner = inner.trim();

    let (url_part, title_part) = match inner.find('"') {
        Some(quote) => {
            let title = inner[quote..].trim();
            let title = strip_enclosing(title, '"').unwrap_or(title);
            (inner[..quote].trim(), title)
        }
        None => (inner, ""),
    };

    let url_part = strip_enclosing(url_part, '"')
        .or_else(|| strip_enclosing(url_part, '\''))
        .unwrap_or(url_part);

    (url_part.to_string(), title_part.to_string())
}

fn strip_enclosing(value: &str, quote: char) -> Option<&str> {
    if value.len() >= 2 {
        value.strip_prefix(quote)?.strip_suffix(quote)
    } else {
        None
    }
}

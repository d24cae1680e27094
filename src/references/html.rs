//! Scanner for inline HTML image tags: `<img src="path" ...>`.

use std::ops::Range;

use super::ImageReference;
use crate::models::ReferenceKind;

/// A located `<img ... src="..." ...>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlImage<'a> {
    /// Byte range of the whole tag in the scanned text.
    pub span: Range<usize>,
    /// Value of the `src` attribute.
    pub src: &'a str,
    /// Everything after the closing `src` quote up to `>`, verbatim.
    pub rest: &'a str,
}

impl ImageReference for HtmlImage<'_> {
    fn kind(&self) -> ReferenceKind {
        ReferenceKind::Html
    }

    fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    fn location(&self) -> &str {
        self.src
    }

    fn render(&self, new_path: &str) -> String {
        format!("<img src=\"{}\"{}>", new_path, self.rest)
    }
}

/// Find every `<img>` tag carrying a quoted `src` attribute, left to right.
///
/// Tag and attribute names match case-insensitively. The `src` value must be non-empty and
/// free of quote characters; either quote style may open or close it. Attributes written
/// before `src` are not captured and do not survive [`ImageReference::render`].
pub fn scan_html_images(text: &str) -> Vec<HtmlImage<'_>> {
    let mut images = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find_ascii_ci(text, cursor, "<img") {
        match parse_img_tag(text, start) {
            Some(image) => {
                cursor = image.span.end;
                images.push(image);
            }
            None => cursor = start + 1,
        }
    }

    images
}

fn parse_img_tag(text: &str, start: usize) -> Option<HtmlImage<'_>> {
    let body_start = start + "<img".len();
    if !text[body_start..].starts_with(char::is_whitespace) {
        return None;
    }

    // `src=` has to begin inside the tag, before its first `>`.
    let tag_limit = text[body_start..]
        .find('>')
        .map_or(text.len(), |offset| body_start + offset);

    let mut search_from = body_start + 1;
    while let Some(attr) = find_ascii_ci(text, search_from, "src=") {
        if attr >= tag_limit {
            return None;
        }
        if let Some(image) = parse_src_attribute(text, start, attr) {
            return Some(image);
        }
        search_from = attr + 1;
    }

    None
}

fn parse_src_attribute(text: &str, start: usize, attr: usize) -> Option<HtmlImage<'_>> {
    let is_quote = |c: char| c == '"' || c == '\'';

    let open = attr + "src=".len();
    if !text[open..].starts_with(is_quote) {
        return None;
    }

    let value_start = open + 1;
    let value_end = text[value_start..]
        .find(is_quote)
        .map(|offset| value_start + offset)?;
    if value_end == value_start {
        return None;
    }

    let rest_start = value_end + 1;
    let close = rest_start + text[rest_start..].find('>')?;

    Some(HtmlImage {
        span: start..close + 1,
        src: &text[value_start..value_end],
        rest: &text[rest_start..close],
    })
}

/// ASCII case-insensitive search for `needle` in `haystack[from..]`.
fn find_ascii_ci(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let needle = needle.as_bytes();
    if from >= bytes.len() || needle.len() > bytes.len() - from {
        return None;
    }

    (from..=bytes.len() - needle.len())
        .find(|&index| bytes[index..index + needle.len()].eq_ignore_ascii_case(needle))
}

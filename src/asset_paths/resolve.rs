use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::filters::is_remote_reference;
use crate::models::ResolvedSource;

/// Classify a raw image location written in a document living in `base_dir`.
///
/// Percent-encoding is decoded first. Relative locations are resolved against the document's
/// directory, never the working directory. Locations that do not name an existing regular file
/// are reported as [`ResolvedSource::Missing`] and logged; they never abort a run.
pub fn resolve_reference(raw: &str, base_dir: &Path) -> ResolvedSource {
    let decoded = decode_location(raw.trim());

    if is_remote_reference(&decoded) {
        debug!("leaving remote image reference untouched: {decoded}");
        return ResolvedSource::Remote;
    }

    let written = Path::new(&*decoded);
    let candidate = if written.is_absolute() {
        written.to_path_buf()
    } else {
        base_dir.join(written)
    };

    if !candidate.is_file() {
        warn!("image file not found: {decoded}");
        return ResolvedSource::Missing {
            raw: decoded.into_owned(),
        };
    }

    ResolvedSource::Local(absolute_path(candidate))
}

fn decode_location(raw: &str) -> Cow<'_, str> {
    if !raw.contains('%') {
        return Cow::Borrowed(raw);
    }
    let bytes = urlencoding::decode_binary(raw.as_bytes());
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

fn absolute_path(candidate: PathBuf) -> PathBuf {
    match fs::canonicalize(&candidate) {
        Ok(resolved) => resolved,
        Err(_) => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn remote_references_are_inert() {
        let dir = tempdir().unwrap();
        assert_eq!(
            resolve_reference("https://example.com/a.png", dir.path()),
            ResolvedSource::Remote
        );
        assert_eq!(
            resolve_reference("HTTP://example.com/a.png", dir.path()),
            ResolvedSource::Remote
        );
    }

    #[test]
    fn encoded_remote_references_are_detected_after_decoding() {
        let dir = tempdir().unwrap();
        assert_eq!(
            resolve_reference("https%3A//example.com/a.png", dir.path()),
            ResolvedSource::Remote
        );
    }

    #[test]
    fn relative_paths_resolve_against_document_directory() -> std::io::Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("shots"))?;
        fs::write(dir.path().join("shots/pic.png"), b"png")?;

        let resolved = resolve_reference("./shots/pic.png", dir.path());
        let expected = fs::canonicalize(dir.path().join("shots/pic.png"))?;
        assert_eq!(resolved, ResolvedSource::Local(expected));
        Ok(())
    }

    #[test]
    fn absolute_paths_are_used_as_is() -> std::io::Result<()> {
        let dir = tempdir()?;
        let elsewhere = tempdir()?;
        let image = elsewhere.path().join("abs.png");
        fs::write(&image, b"png")?;

        let resolved = resolve_reference(&image.to_string_lossy(), dir.path());
        assert_eq!(resolved, ResolvedSource::Local(fs::canonicalize(&image)?));
        Ok(())
    }

    #[test]
    fn percent_encoded_spaces_and_unicode_are_decoded() -> std::io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("图像 1.png"), b"png")?;

        let resolved = resolve_reference("%E5%9B%BE%E5%83%8F%201.png", dir.path());
        assert_eq!(
            resolved,
            ResolvedSource::Local(fs::canonicalize(dir.path().join("图像 1.png"))?)
        );
        Ok(())
    }

    #[test]
    fn missing_files_report_the_decoded_location() {
        let dir = tempdir().unwrap();
        assert_eq!(
            resolve_reference("does_not%20exist.png", dir.path()),
            ResolvedSource::Missing {
                raw: "does_not exist.png".into()
            }
        );
    }

    #[test]
    fn directories_are_not_images() {
        let dir = tempdir().unwrap();
        assert_eq!(
            resolve_reference("", dir.path()),
            ResolvedSource::Missing { raw: String::new() }
        );
    }
}

use std::path::Path;

use anyhow::{Result, bail};

/// Produce the path an image is referenced by from inside the rewritten document.
///
/// The result always uses forward slashes so that the bundle opens the same way on every
/// platform, regardless of the native separator of the machine that produced it.
pub fn make_bundle_asset_path(images_dir_name: &str, file_name: &str) -> String {
    format!("{}/{}", images_dir_name.trim_matches(['/', '\\']), file_name).replace('\\', "/")
}

/// Check that an images folder name stays inside the bundle.
///
/// The name must be non-empty, relative, and free of `..` segments; both `/` and `\\` count as
/// separators since the name also ends up in rewritten references.
pub fn validate_images_dir_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.trim_matches(['/', '\\']).is_empty() {
        bail!("images folder name must not be empty");
    }
    if trimmed.starts_with(['/', '\\']) || Path::new(trimmed).is_absolute() {
        bail!("images folder name must be relative, got {name:?}");
    }
    if trimmed.contains(':') {
        bail!("images folder name must not contain a drive or scheme, got {name:?}");
    }
    if trimmed.split(['/', '\\']).any(|segment| segment == "..") {
        bail!("images folder name must not leave the bundle, got {name:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{make_bundle_asset_path, validate_images_dir_name};

    #[test]
    fn joins_images_dir_and_file_name() {
        assert_eq!(make_bundle_asset_path("images", "logo.png"), "images/logo.png");
    }

    #[test]
    fn normalises_backslashes_from_windows_inputs() {
        assert_eq!(make_bundle_asset_path("assets\\img\\", "a b.png"), "assets/img/a b.png");
    }

    #[test]
    fn accepts_nested_relative_folders() {
        assert!(validate_images_dir_name("images").is_ok());
        assert!(validate_images_dir_name("assets/img").is_ok());
        assert!(validate_images_dir_name("./图片").is_ok());
    }

    #[test]
    fn rejects_folders_outside_the_bundle() {
        for name in ["", "  ", "/", "/tmp/x", "\\share\\x", "C:\\img", "..", "img/../../x", "a\\..\\b"] {
            assert!(validate_images_dir_name(name).is_err(), "{name:?} should be rejected");
        }
    }
}

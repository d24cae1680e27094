//! Zip the assembled output tree next to the source document.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Component, Path};

use anyhow::{Context, Result};
use log::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write every file under `source_root` into a deflate-compressed archive at `archive_path`.
///
/// Entry names are relative to `base_dir` and always use `/`, so with `base_dir` being the
/// document directory every entry starts with the output folder name. Returns the number of
/// entries written.
pub fn write_archive(source_root: &Path, base_dir: &Path, archive_path: &Path) -> Result<usize> {
  let file = File::create(archive_path)
    .with_context(|| format!("failed to create {}", archive_path.display()))?;
  let mut zip = ZipWriter::new(BufWriter::new(file));
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
  let mut written = 0;

  for entry in WalkDir::new(source_root).sort_by_file_name() {
    let entry = entry.with_context(|| format!("failed to walk {}", source_root.display()))?;
    if !entry.file_type().is_file() {
      continue;
    }

    let path = entry.path();
    let name = archive_entry_name(path, base_dir)?;
    zip
      .start_file(name.as_str(), options)
      .with_context(|| format!("failed to add {name} to {}", archive_path.display()))?;
    let mut source =
      File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    io::copy(&mut source, &mut zip)
      .with_context(|| format!("failed to compress {}", path.display()))?;
    debug!("archived {name}");
    written += 1;
  }

  zip
    .finish()
    .with_context(|| format!("failed to finish {}", archive_path.display()))?;
  Ok(written)
}

fn archive_entry_name(path: &Path, base_dir: &Path) -> Result<String> {
  let relative = path.strip_prefix(base_dir).with_context(|| {
    format!(
      "{} is outside of {}",
      path.display(),
      base_dir.display()
    )
  })?;

  let segments: Vec<String> = relative
    .components()
    .filter_map(|component| match component {
      Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
      _ => None,
    })
    .collect();
  Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
  use std::fs;
  use std::io::Read;

  use super::*;
  use tempfile::tempdir;
  use zip::ZipArchive;

  #[test]
  fn archives_every_file_relative_to_base() -> Result<()> {
    let temp = tempdir()?;
    let base = temp.path();
    let root = base.join("trip");
    fs::create_dir_all(root.join("images/nested"))?;
    fs::write(root.join("trip.md"), "![x](images/a.png)")?;
    fs::write(root.join("images/a.png"), b"aaaa")?;
    fs::write(root.join("images/图 1.png"), b"unicode")?;
    fs::write(root.join("images/nested/b.png"), b"bbbb")?;
    fs::create_dir_all(root.join("empty"))?;

    let archive_path = base.join("trip.zip");
    let count = write_archive(&root, base, &archive_path)?;
    assert_eq!(count, 4);

    let mut archive = ZipArchive::new(File::open(&archive_path)?)?;
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
      names,
      vec![
        "trip/images/a.png",
        "trip/images/nested/b.png",
        "trip/images/图 1.png",
        "trip/trip.md",
      ]
    );

    let mut entry = archive.by_name("trip/trip.md")?;
    assert_eq!(entry.compression(), CompressionMethod::Deflated);
    let mut body = String::new();
    entry.read_to_string(&mut body)?;
    assert_eq!(body, "![x](images/a.png)");
    Ok(())
  }

  #[test]
  fn empty_tree_yields_empty_archive() -> Result<()> {
    let temp = tempdir()?;
    let root = temp.path().join("doc");
    fs::create_dir_all(root.join("images"))?;

    let archive_path = temp.path().join("doc.zip");
    assert_eq!(write_archive(&root, temp.path(), &archive_path)?, 0);
    assert!(archive_path.exists());
    Ok(())
  }
}

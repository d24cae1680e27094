//! Copy resolved images into the bundle's images folder without clobbering.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use same_file::is_same_file;

use crate::asset_paths::{DestinationCandidates, make_bundle_asset_path};
use crate::models::{PlacedAsset, PlacementKind};

const COMPARE_CHUNK: usize = 64 * 1024;

/// Place `source` inside `assets_dir`, returning the bundle-relative path to reference it by.
///
/// Slots are tried in [`DestinationCandidates`] order. An empty slot receives a byte copy of
/// the source. A slot whose content already equals the source is reused without copying, so
/// repeated references to one image converge on the same file. Any other occupied slot moves
/// on to the next candidate name.
pub fn place_asset(source: &Path, assets_dir: &Path, images_dir_name: &str) -> Result<PlacedAsset> {
  for file_name in DestinationCandidates::for_source(source) {
    let destination = assets_dir.join(&file_name);

    let placement = if !destination.exists() {
      fs::copy(source, &destination).with_context(|| {
        format!(
          "failed to copy {} to {}",
          source.display(),
          destination.display()
        )
      })?;
      debug!("copied {} -> {}", source.display(), destination.display());
      PlacementKind::Copied
    } else if contents_match(source, &destination)? {
      debug!("reusing identical {}", destination.display());
      PlacementKind::Reused
    } else {
      continue;
    };

    return Ok(PlacedAsset {
      source: source.to_path_buf(),
      bundle_path: make_bundle_asset_path(images_dir_name, &file_name),
      file_name,
      placement,
    });
  }

  unreachable!("destination candidates are unbounded")
}

/// Byte-level equality of two files: same size, then a full streamed comparison.
fn contents_match(source: &Path, destination: &Path) -> Result<bool> {
  if is_same_file(source, destination)
    .with_context(|| format!("failed to inspect {}", destination.display()))?
  {
    return Ok(true);
  }

  let source_len = fs::metadata(source)
    .with_context(|| format!("failed to read metadata for {}", source.display()))?
    .len();
  let destination_meta = fs::metadata(destination)
    .with_context(|| format!("failed to read metadata for {}", destination.display()))?;
  if !destination_meta.is_file() || destination_meta.len() != source_len {
    return Ok(false);
  }

  let mut left = BufReader::new(
    File::open(source).with_context(|| format!("failed to open {}", source.display()))?,
  );
  let mut right = BufReader::new(
    File::open(destination).with_context(|| format!("failed to open {}", destination.display()))?,
  );
  let mut left_buf = vec![0u8; COMPARE_CHUNK];
  let mut right_buf = vec![0u8; COMPARE_CHUNK];

  loop {
    let read = read_chunk(&mut left, &mut left_buf)
      .with_context(|| format!("failed to read {}", source.display()))?;
    let other = read_chunk(&mut right, &mut right_buf)
      .with_context(|| format!("failed to read {}", destination.display()))?;
    if read != other || left_buf[..read] != right_buf[..other] {
      return Ok(false);
    }
    if read == 0 {
      return Ok(true);
    }
  }
}

/// Fill `buf` as far as the reader allows, returning the number of bytes read.
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
  let mut filled = 0;
  while filled < buf.len() {
    match reader.read(&mut buf[filled..]) {
      Ok(0) => break,
      Ok(read) => filled += read,
      Err(err) if err.kind() == ErrorKind::Interrupted => continue,
      Err(err) => return Err(err),
    }
  }
  Ok(filled)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
      .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
      .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
  }

  #[test]
  fn copies_into_empty_slot() -> Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("pic.png");
    fs::write(&source, b"pixels")?;
    let assets = temp.path().join("out/images");
    fs::create_dir_all(&assets)?;

    let placed = place_asset(&source, &assets, "images")?;
    assert_eq!(placed.bundle_path, "images/pic.png");
    assert_eq!(placed.placement, PlacementKind::Copied);
    assert_eq!(fs::read(assets.join("pic.png"))?, b"pixels");
    Ok(())
  }

  #[test]
  fn identical_content_is_a_cache_hit() -> Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("pic.png");
    fs::write(&source, b"pixels")?;
    let assets = temp.path().join("images");
    fs::create_dir_all(&assets)?;

    let first = place_asset(&source, &assets, "images")?;
    let second = place_asset(&source, &assets, "images")?;

    assert_eq!(first.bundle_path, "images/pic.png");
    assert_eq!(second.bundle_path, "images/pic.png");
    assert_eq!(second.placement, PlacementKind::Reused);
    assert_eq!(entries(&assets)?, vec!["pic.png"]);
    Ok(())
  }

  #[test]
  fn identical_content_from_another_directory_is_reused() -> Result<()> {
    let temp = tempdir()?;
    fs::create_dir_all(temp.path().join("a"))?;
    fs::create_dir_all(temp.path().join("b"))?;
    fs::write(temp.path().join("a/pic.png"), b"same")?;
    fs::write(temp.path().join("b/pic.png"), b"same")?;
    let assets = temp.path().join("images");
    fs::create_dir_all(&assets)?;

    place_asset(&temp.path().join("a/pic.png"), &assets, "images")?;
    let placed = place_asset(&temp.path().join("b/pic.png"), &assets, "images")?;

    assert_eq!(placed.bundle_path, "images/pic.png");
    assert_eq!(placed.placement, PlacementKind::Reused);
    assert_eq!(entries(&assets)?, vec!["pic.png"]);
    Ok(())
  }

  #[test]
  fn differing_content_gets_numbered_names() -> Result<()> {
    let temp = tempdir()?;
    for (dir, body) in [("a", "first"), ("b", "second"), ("c", "third!")] {
      fs::create_dir_all(temp.path().join(dir))?;
      fs::write(temp.path().join(dir).join("pic.png"), body)?;
    }
    let assets = temp.path().join("images");
    fs::create_dir_all(&assets)?;

    let a = place_asset(&temp.path().join("a/pic.png"), &assets, "images")?;
    let b = place_asset(&temp.path().join("b/pic.png"), &assets, "images")?;
    let c = place_asset(&temp.path().join("c/pic.png"), &assets, "images")?;
    let b_again = place_asset(&temp.path().join("b/pic.png"), &assets, "images")?;

    assert_eq!(a.bundle_path, "images/pic.png");
    assert_eq!(b.bundle_path, "images/pic_1.png");
    assert_eq!(c.bundle_path, "images/pic_2.png");
    assert_eq!(b_again.bundle_path, "images/pic_1.png");
    assert_eq!(b_again.placement, PlacementKind::Reused);

    assert_eq!(fs::read(assets.join("pic.png"))?, b"first");
    assert_eq!(fs::read(assets.join("pic_1.png"))?, b"second");
    assert_eq!(fs::read(assets.join("pic_2.png"))?, b"third!");
    assert_eq!(entries(&assets)?, vec!["pic.png", "pic_1.png", "pic_2.png"]);
    Ok(())
  }

  #[test]
  fn same_size_different_bytes_are_not_identical() -> Result<()> {
    let temp = tempdir()?;
    let left = temp.path().join("left.bin");
    let right = temp.path().join("right.bin");
    fs::write(&left, vec![1u8; COMPARE_CHUNK + 10])?;
    let mut other = vec![1u8; COMPARE_CHUNK + 10];
    other[COMPARE_CHUNK + 5] = 2;
    fs::write(&right, other)?;

    assert!(!contents_match(&left, &right)?);
    assert!(contents_match(&left, &left)?);
    Ok(())
  }

  #[test]
  fn missing_source_is_an_error() -> Result<()> {
    let temp = tempdir()?;
    let assets = temp.path().join("images");
    fs::create_dir_all(&assets)?;

    let result = place_asset(&temp.path().join("gone.png"), &assets, "images");
    assert!(result.is_err());
    Ok(())
  }
}

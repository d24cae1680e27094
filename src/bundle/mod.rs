//! Helpers for writing the bundle's output tree and archive to disk.

pub mod archive;
pub mod output;

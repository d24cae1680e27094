#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod config;
pub mod models;
pub mod placement;
pub mod project;
pub mod references;

pub use builder::{PackArtifacts, PackBuilder};
pub use config::PackConfig;
pub use models::{PackSummary, PlacedAsset, PlacementKind, ReferenceKind, ResolvedSource};
pub use project::PackLayout;
pub use references::{ReferenceRewriter, RewriteOutcome};

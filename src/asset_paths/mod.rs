//! Helpers for classifying image locations and naming their bundled copies.
//!
//! Remote detection, source resolution, destination naming and bundle-relative paths live
//! in separate submodules so each rule can be tested on its own.

mod bundle;
mod candidates;
mod filters;
mod resolve;

pub use bundle::{make_bundle_asset_path, validate_images_dir_name};
pub use candidates::DestinationCandidates;
pub use filters::is_remote_reference;
pub use resolve::resolve_reference;

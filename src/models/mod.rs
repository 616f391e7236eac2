//! Packaging data models

pub mod entry_point;
pub mod manifest;

pub use entry_point::EntryPoint;
pub use manifest::{EntryPoints, PackageInfo, PackageManifest, MANIFEST_FILE};

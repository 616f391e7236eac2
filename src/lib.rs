//! sfp - Simple Fast Project
//!
//! sfp bootstraps Kedro data-science projects: it checks the Python
//! interpreter, installs a set of recommended packages with pip, runs
//! `kedro new` and lays out the extra project folders. It can also build
//! the small launcher distribution that ships the `sfp` executable as
//! package data.
//!
//! # Quick Start
//!
//! ```bash
//! # Bootstrap a project (prompts for the name)
//! sfp
//!
//! # Same, non-interactively
//! sfp new demand_forecast
//!
//! # Check python / pip / kedro
//! sfp doctor
//!
//! # Build the launcher distribution
//! sfp package init && sfp package build
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod dist;
pub mod doctor;
pub mod env;
pub mod error;
pub mod models;
pub mod process;
pub mod scaffold;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{SfpError, Result};
pub use models::{EntryPoint, PackageManifest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Check whether a manifest directory can be packaged
///
/// # Arguments
///
/// * `root` - Directory holding `package.toml`, `README.md` and `LICENSE.md`
///
/// # Returns
///
/// The distribution plan on success
pub fn plan_distribution(root: &std::path::Path) -> Result<dist::DistributionPlan> {
    let manifest = PackageManifest::load(&root.join(models::MANIFEST_FILE))?;
    dist::DistributionBuilder::new(manifest, root)?.plan()
}

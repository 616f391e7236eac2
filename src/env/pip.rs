//! pip package auditing and installation

use std::collections::BTreeSet;

use regex::Regex;
use tracing::debug;

use crate::error::{SfpError, Result};
use crate::process::{CommandRunner, Invocation};

/// Normalize a distribution name (PEP 503)
pub fn normalize_name(name: &str) -> String {
    lazy_static::lazy_static! {
        static ref SEPARATORS: Regex = Regex::new(r"[-_.]+").unwrap();
    }

    SEPARATORS.replace_all(name.trim(), "-").to_lowercase()
}

/// Set of installed distributions as reported by `pip list`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackages {
    names: BTreeSet<String>,
}

impl InstalledPackages {
    /// Parse the tabular output of `pip list`
    pub fn parse(listing: &str) -> Self {
        let lines: Vec<&str> = listing.lines().collect();

        // Table rows start after the dashed rule under the header
        let start = lines
            .iter()
            .position(|l| l.trim_start().starts_with("---"))
            .map(|i| i + 1)
            .unwrap_or(0);

        let names = lines[start..]
            .iter()
            .filter_map(|l| l.split_whitespace().next())
            .filter(|name| !name.starts_with('['))
            .map(normalize_name)
            .collect();

        Self { names }
    }

    /// Whether a distribution is installed
    pub fn contains(&self, package: &str) -> bool {
        self.names.contains(&normalize_name(package))
    }

    /// Packages from `wanted` that are not installed, in request order
    pub fn missing(&self, wanted: &[String]) -> Vec<String> {
        wanted
            .iter()
            .filter(|p| !self.contains(p))
            .cloned()
            .collect()
    }

    /// Number of installed distributions
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is installed
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// pip front end
#[derive(Debug, Clone)]
pub struct Pip {
    program: String,
}

impl Pip {
    /// Use the given pip executable
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    /// Query installed distributions
    pub fn list(&self, runner: &impl CommandRunner) -> Result<InstalledPackages> {
        let out = runner.output(&Invocation::new(&self.program).arg("list"))?;
        if !out.success {
            return Err(SfpError::command(
                format!("{} list", self.program),
                out.stderr.trim().to_string(),
            ));
        }
        let installed = InstalledPackages::parse(&out.stdout);
        debug!("pip reports {} installed packages", installed.len());
        Ok(installed)
    }

    /// Install a single package, streaming pip's output to the terminal
    pub fn install(&self, runner: &impl CommandRunner, package: &str) -> Result<()> {
        let out = runner.interactive(&Invocation::new(&self.program).args(["install", package]))?;
        if out.success {
            Ok(())
        } else {
            Err(SfpError::PackageInstall(package.to_string()))
        }
    }
}

impl Default for Pip {
    fn default() -> Self {
        Self::new("pip")
    }
}

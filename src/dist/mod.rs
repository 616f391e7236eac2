//! Source distribution builder
//!
//! Collects everything a [`PackageManifest`] declares (long description,
//! license text, python packages and their package data) and writes it to a
//! `<name>-<version>.tar.gz` archive.

mod archive;

pub use archive::{entry_points_txt, pkg_info, BuiltDistribution};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{SfpError, Result};
use crate::models::{PackageManifest, MANIFEST_FILE};

/// Directory names never descended into
const SKIPPED_DIRS: [&str; 3] = ["target", "__pycache__", "node_modules"];

/// Everything that goes into the archive, relative to the project root
#[derive(Debug, Clone, Serialize)]
pub struct DistributionPlan {
    /// Archive base name, `<name>-<version>`
    pub dist_name: String,
    /// Manifest file, archived next to the README
    pub manifest: PathBuf,
    /// Contents of the README
    #[serde(skip)]
    pub long_description: String,
    /// README path
    pub readme: PathBuf,
    /// License file path
    pub license: PathBuf,
    /// Python package directories (contain `__init__.py`)
    pub packages: Vec<PathBuf>,
    /// Python sources inside packages
    pub sources: Vec<PathBuf>,
    /// Package data files matched by the manifest globs
    pub data_files: Vec<PathBuf>,
}

impl DistributionPlan {
    /// Files copied verbatim into the archive, in archive order
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files = vec![self.manifest.clone(), self.readme.clone(), self.license.clone()];
        files.extend(self.sources.iter().cloned());
        files.extend(self.data_files.iter().cloned());
        let mut seen = BTreeSet::new();
        files.retain(|f| seen.insert(f.clone()));
        files
    }
}

/// Builds distributions for a manifest rooted at a directory
pub struct DistributionBuilder {
    manifest: PackageManifest,
    manifest_file: PathBuf,
    root: PathBuf,
    exclude: Vec<PathBuf>,
}

impl DistributionBuilder {
    /// Create a builder; `root` is the directory holding the manifest
    pub fn new(manifest: PackageManifest, root: impl AsRef<Path>) -> Result<Self> {
        manifest.validate()?;
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(SfpError::file_not_found(&root));
        }
        Ok(Self {
            manifest,
            manifest_file: PathBuf::from(MANIFEST_FILE),
            root,
            exclude: Vec::new(),
        })
    }

    /// Name of the manifest file inside the root (default `package.toml`)
    pub fn manifest_file(mut self, name: impl AsRef<Path>) -> Self {
        self.manifest_file = name.as_ref().to_path_buf();
        self
    }

    /// Never collect files below `path`
    pub fn exclude(mut self, path: impl AsRef<Path>) -> Self {
        self.exclude.push(path.as_ref().to_path_buf());
        self
    }

    /// The manifest being packaged
    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    /// Work out the archive contents without writing anything
    pub fn plan(&self) -> Result<DistributionPlan> {
        let info = &self.manifest.package;

        let readme = PathBuf::from(&info.readme);
        let readme_path = self.root.join(&readme);
        if !readme_path.is_file() {
            return Err(SfpError::MissingReadme { path: readme_path });
        }
        let long_description = std::fs::read_to_string(&readme_path)?;

        let license = PathBuf::from(&info.license_file);
        let license_path = self.root.join(&license);
        if !license_path.is_file() {
            return Err(SfpError::MissingLicense { path: license_path });
        }

        if !self.root.join(&self.manifest_file).is_file() {
            return Err(SfpError::file_not_found(self.root.join(&self.manifest_file)));
        }

        let (files, packages) = self.scan()?;

        let sources: Vec<PathBuf> = files
            .iter()
            .filter(|f| f.extension().map_or(false, |ext| ext == "py"))
            .filter(|f| f.parent().map_or(false, |p| packages.contains(p)))
            .cloned()
            .collect();

        let data_files = if info.include_package_data {
            self.match_package_data(&files)?
        } else {
            Vec::new()
        };

        debug!(
            "planned {} packages, {} sources, {} data files",
            packages.len(),
            sources.len(),
            data_files.len()
        );

        Ok(DistributionPlan {
            dist_name: self.manifest.dist_name(),
            manifest: self.manifest_file.clone(),
            long_description,
            readme,
            license,
            packages: packages.into_iter().collect(),
            sources,
            data_files,
        })
    }

    /// Plan and write the archive into `output_dir`
    pub fn build(&self, output_dir: &Path) -> Result<BuiltDistribution> {
        let plan = self.plan()?;
        archive::write(&self.manifest, &plan, &self.root, output_dir)
    }

    /// All regular files and package directories below the root
    fn scan(&self) -> Result<(Vec<PathBuf>, BTreeSet<PathBuf>)> {
        let exclude: Vec<PathBuf> = self
            .exclude
            .iter()
            .map(|p| p.canonicalize().unwrap_or_else(|_| p.clone()))
            .collect();

        let mut files = Vec::new();
        let mut packages = BTreeSet::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                if name.starts_with('.') || SKIPPED_DIRS.iter().any(|d| name == *d) {
                    return false;
                }
                let canonical = e.path().canonicalize().unwrap_or_else(|_| e.path().to_path_buf());
                !exclude.iter().any(|x| canonical.starts_with(x))
            });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = match entry.path().strip_prefix(&self.root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            if entry.file_name() == "__init__.py" {
                if let Some(parent) = rel.parent() {
                    packages.insert(parent.to_path_buf());
                }
            }
            files.push(rel);
        }

        Ok((files, packages))
    }

    /// Files matched by the `package_data` globs
    fn match_package_data(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut matched = BTreeSet::new();

        for (package, patterns) in &self.manifest.package_data {
            let base: PathBuf = package.split('.').filter(|s| !s.is_empty()).collect();
            for raw in patterns {
                let pattern = Pattern::new(raw)?;
                let by_name = !raw.contains('/');

                for file in files {
                    let Ok(rel) = file.strip_prefix(&base) else {
                        continue;
                    };
                    let hit = if by_name {
                        file.file_name().map_or(false, |n| pattern.matches(&n.to_string_lossy()))
                    } else {
                        pattern.matches_path(rel)
                    };
                    if hit {
                        matched.insert(file.clone());
                    }
                }
            }
        }

        Ok(matched.into_iter().collect())
    }
}

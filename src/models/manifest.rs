//! Package manifest (`package.toml`)
//!
//! Static metadata describing the distributable launcher package: identity,
//! authorship, license, long description source, console scripts and the
//! package-data globs bundled next to the code.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SfpError, Result};

use super::EntryPoint;

/// Default manifest file name
pub const MANIFEST_FILE: &str = "package.toml";

/// Full manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Package metadata
    pub package: PackageInfo,

    /// Declared entry points
    #[serde(default)]
    pub entry_points: EntryPoints,

    /// Package data globs keyed by package (`""` applies to every package)
    #[serde(default)]
    pub package_data: BTreeMap<String, Vec<String>>,
}

/// Package metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Distribution name
    pub name: String,
    /// Distribution version
    pub version: String,
    /// Author name
    #[serde(default)]
    pub author: Option<String>,
    /// Author email
    #[serde(default)]
    pub author_email: Option<String>,
    /// One-line description
    #[serde(default)]
    pub description: Option<String>,
    /// Project URL
    #[serde(default)]
    pub url: Option<String>,
    /// License name
    #[serde(default)]
    pub license: Option<String>,
    /// File holding the license text
    #[serde(default = "default_license_file")]
    pub license_file: String,
    /// File holding the long description
    #[serde(default = "default_readme")]
    pub readme: String,
    /// Content type of the long description
    #[serde(default = "default_readme_content_type")]
    pub readme_content_type: String,
    /// Runtime requirements
    #[serde(default)]
    pub install_requires: Vec<String>,
    /// Bundle files matched by `package_data`
    #[serde(default = "default_true")]
    pub include_package_data: bool,
}

/// Entry point groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoints {
    /// Commands installed on `PATH`
    #[serde(default)]
    pub console_scripts: Vec<EntryPoint>,
}

fn default_license_file() -> String {
    "LICENSE.md".to_string()
}

fn default_readme() -> String {
    "README.md".to_string()
}

fn default_readme_content_type() -> String {
    "text/markdown".to_string()
}

fn default_true() -> bool {
    true
}

impl PackageManifest {
    /// Manifest of the `sfp` launcher distribution
    pub fn sfp() -> Self {
        Self {
            package: PackageInfo {
                name: "sfp".to_string(),
                version: "0.1".to_string(),
                author: Some("Yair Camborda".to_string()),
                author_email: Some("yairoriginal@gmail.com".to_string()),
                description: Some("Una herramienta para ejecutar sfp.exe".to_string()),
                url: Some("https://https://github.com/Yairama/simple_fast_project".to_string()),
                license: Some("Apache 2.0".to_string()),
                license_file: default_license_file(),
                readme: default_readme(),
                readme_content_type: default_readme_content_type(),
                install_requires: Vec::new(),
                include_package_data: true,
            },
            entry_points: EntryPoints {
                console_scripts: vec![EntryPoint {
                    name: "sfp".to_string(),
                    module: "simple_fast_project.main".to_string(),
                    function: "run".to_string(),
                }],
            },
            package_data: BTreeMap::from([(String::new(), vec!["*.exe".to_string()])]),
        }
    }

    /// Parse and validate a manifest
    pub fn from_toml(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load and validate a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SfpError::file_not_found(path));
        }
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SfpError::InvalidManifest(e.to_string()))
    }

    /// Write the manifest, refusing to overwrite unless `force`
    pub fn write(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(SfpError::InvalidManifest(format!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            )));
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Check the invariants the packaging step relies on
    pub fn validate(&self) -> Result<()> {
        if self.package.name.trim().is_empty() {
            return Err(SfpError::InvalidManifest("package name is empty".into()));
        }
        if self.package.version.trim().is_empty() {
            return Err(SfpError::InvalidManifest("package version is empty".into()));
        }

        let mut seen = HashSet::new();
        for ep in &self.entry_points.console_scripts {
            if !seen.insert(ep.name.as_str()) {
                return Err(SfpError::DuplicateEntryPoint(ep.name.clone()));
            }
        }

        for patterns in self.package_data.values() {
            for pattern in patterns {
                glob::Pattern::new(pattern)?;
            }
        }

        Ok(())
    }

    /// `<name>-<version>`
    pub fn dist_name(&self) -> String {
        format!("{}-{}", self.package.name, self.package.version)
    }

    /// Console script by command name
    pub fn console_script(&self, name: &str) -> Option<&EntryPoint> {
        self.entry_points.console_scripts.iter().find(|ep| ep.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sfp_manifest() {
        let manifest = PackageManifest::sfp();
        manifest.validate().unwrap();
        assert_eq!(manifest.dist_name(), "sfp-0.1");
        assert!(manifest.package.install_requires.is_empty());
        assert_eq!(manifest.package_data[""], vec!["*.exe"]);

        let ep = manifest.console_script("sfp").unwrap();
        assert_eq!(ep.to_string(), "sfp = simple_fast_project.main:run");
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_FILE);

        PackageManifest::sfp().write(&path, false).unwrap();
        assert!(PackageManifest::sfp().write(&path, false).is_err());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("sfp = simple_fast_project.main:run"));
        assert_eq!(PackageManifest::load(&path).unwrap(), PackageManifest::sfp());
    }

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest = PackageManifest::from_toml(
            "[package]\nname = \"tool\"\nversion = \"1.0\"\n",
        )
        .unwrap();
        assert_eq!(manifest.package.readme, "README.md");
        assert_eq!(manifest.package.license_file, "LICENSE.md");
        assert!(manifest.package.include_package_data);
        assert!(manifest.entry_points.console_scripts.is_empty());
    }

    #[test]
    fn test_duplicate_console_script() {
        let err = PackageManifest::from_toml(
            r#"
[package]
name = "sfp"
version = "0.1"

[entry_points]
console_scripts = ["sfp = a.main:run", "sfp = b.main:run"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, SfpError::DuplicateEntryPoint(ref n) if n == "sfp"));
    }

    #[test]
    fn test_invalid_entry_point_rejected() {
        let err = PackageManifest::from_toml(
            "[package]\nname = \"x\"\nversion = \"1\"\n[entry_points]\nconsole_scripts = [\"x\"]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid entry point"));
    }

    #[test]
    fn test_empty_version_rejected() {
        let err = PackageManifest::from_toml("[package]\nname = \"x\"\nversion = \" \"\n").unwrap_err();
        assert!(matches!(err, SfpError::InvalidManifest(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PackageManifest::load(Path::new("/nonexistent/package.toml")).unwrap_err();
        assert!(matches!(err, SfpError::FileNotFound { .. }));
    }
}

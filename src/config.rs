//! Configuration management for sfp

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{SfpError, Result};

/// Packages every new project environment should have
pub const DEFAULT_PACKAGES: [&str; 9] = [
    "numpy",
    "pandas",
    "matplotlib",
    "seaborn",
    "plotly",
    "openpyxl",
    "ipykernel",
    "jupyter",
    "jupyterlab",
];

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const KEYS: [&str; 9] = [
    "general.python",
    "general.pip",
    "packages.recommended",
    "packages.strict",
    "scaffold.kedro",
    "scaffold.starter",
    "scaffold.extra_folders",
    "logging.level",
    "logging.color",
];

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Recommended package settings
    #[serde(default)]
    pub packages: PackagesConfig,

    /// Project scaffolding settings
    #[serde(default)]
    pub scaffold: ScaffoldConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Python interpreter override (default: python3 on unix, python elsewhere)
    pub python: Option<String>,
    /// pip executable override (default: pip)
    pub pip: Option<String>,
}

/// Recommended package configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Packages checked and installed during bootstrap
    pub recommended: Vec<String>,
    /// Abort the bootstrap on the first failed install
    pub strict: bool,
}

/// Project scaffolding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Kedro executable
    pub kedro: String,
    /// Kedro starter template
    pub starter: String,
    /// Folders created inside the new project
    pub extra_folders: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Enable colored output
    pub color: bool,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            recommended: DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect(),
            strict: false,
        }
    }
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            kedro: "kedro".to_string(),
            starter: "standalone-datacatalog".to_string(),
            extra_folders: vec!["src".to_string(), "resources".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SfpError::config("Could not find config directory"))?;
        Ok(config_dir.join("sfp").join("config.toml"))
    }

    /// Resolve an optional override against the default path
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(p.to_path_buf()),
            None => Self::config_path(),
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SfpError::config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset(path: &Path) -> Result<()> {
        Self::default().save_to(path)
    }

    /// Initialize configuration file
    pub fn init(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(SfpError::config(
                "Configuration file already exists. Use --force to overwrite.",
            ));
        }

        Self::default().save_to(path)
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "general.python" => self.general.python.clone(),
            "general.pip" => self.general.pip.clone(),

            "packages.recommended" => Some(self.packages.recommended.join(",")),
            "packages.strict" => Some(self.packages.strict.to_string()),

            "scaffold.kedro" => Some(self.scaffold.kedro.clone()),
            "scaffold.starter" => Some(self.scaffold.starter.clone()),
            "scaffold.extra_folders" => Some(self.scaffold.extra_folders.join(",")),

            "logging.level" => Some(self.logging.level.clone()),
            "logging.color" => Some(self.logging.color.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "general.python" => {
                self.general.python = optional(value);
            }
            "general.pip" => {
                self.general.pip = optional(value);
            }

            "packages.recommended" => {
                self.packages.recommended = split_list(value);
            }
            "packages.strict" => {
                self.packages.strict = parse_bool(key, value)?;
            }

            "scaffold.kedro" => {
                self.scaffold.kedro = value.to_string();
            }
            "scaffold.starter" => {
                if value.trim().is_empty() {
                    return Err(SfpError::config("Starter can't be empty"));
                }
                self.scaffold.starter = value.trim().to_string();
            }
            "scaffold.extra_folders" => {
                self.scaffold.extra_folders = split_list(value);
            }

            "logging.level" => {
                let level = value.to_lowercase();
                if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
                    return Err(SfpError::config(format!("Invalid log level: {}", value)));
                }
                self.logging.level = level;
            }
            "logging.color" => {
                self.logging.color = parse_bool(key, value)?;
            }

            _ => {
                return Err(SfpError::config(unknown_key_message(key)));
            }
        }

        Ok(())
    }

    /// Python interpreter to use on this platform
    pub fn python_command(&self, is_unix: bool) -> String {
        self.general
            .python
            .clone()
            .unwrap_or_else(|| crate::env::python_command(is_unix).to_string())
    }

    /// pip executable to use
    pub fn pip_command(&self) -> String {
        self.general.pip.clone().unwrap_or_else(|| "pip".to_string())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| SfpError::config(format!("Invalid boolean for {}", key)))
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_string()) }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn unknown_key_message(key: &str) -> String {
    let closest = KEYS
        .iter()
        .map(|k| (*k, strsim::jaro_winkler(key, k)))
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1));

    match closest {
        Some((suggestion, _)) => format!(
            "Unknown configuration key: {} (did you mean '{}'?)",
            key, suggestion
        ),
        None => format!("Unknown configuration key: {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.packages.recommended.len(), 9);
        assert_eq!(config.packages.recommended[0], "numpy");
        assert_eq!(config.scaffold.starter, "standalone-datacatalog");
        assert_eq!(config.scaffold.extra_folders, vec!["src", "resources"]);
        assert!(!config.packages.strict);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        config.set("packages.recommended", "numpy, polars,,").unwrap();
        assert_eq!(config.packages.recommended, vec!["numpy", "polars"]);
        assert_eq!(config.get("packages.recommended"), Some("numpy,polars".to_string()));

        config.set("general.python", "python3.12").unwrap();
        assert_eq!(config.python_command(true), "python3.12");
        config.set("general.python", "").unwrap();
        assert_eq!(config.python_command(true), "python3");
        assert_eq!(config.python_command(false), "python");
    }

    #[test]
    fn test_every_key_readable() {
        let mut config = Config::default();
        config.general.python = Some("py".into());
        config.general.pip = Some("pip3".into());
        for key in KEYS {
            assert!(config.get(key).is_some(), "{} missing", key);
        }
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("packages.strict", "maybe").is_err());
        assert!(config.set("logging.level", "loud").is_err());
        assert!(config.set("scaffold.starter", "  ").is_err());
    }

    #[test]
    fn test_unknown_key_suggestion() {
        let mut config = Config::default();
        let err = config.set("scaffold.startr", "x").unwrap_err();
        assert!(err.to_string().contains("did you mean 'scaffold.starter'"));

        let err = config.set("zzz", "x").unwrap_err();
        assert!(!err.to_string().contains("did you mean"));
    }

    #[test]
    fn test_auto_yes_is_not_a_key() {
        let mut config = Config::default();
        assert!(config.set("general.auto_yes", "true").is_err());
        assert!(config.get("general.auto_yes").is_none());
        assert!(!KEYS.contains(&"general.auto_yes"));
    }

    #[test]
    fn test_old_file_with_auto_yes_still_loads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[general]\nauto_yes = true\npython = \"py\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.python_command(true), "py");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("packages.strict", "true").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(loaded.packages.strict);

        assert!(Config::init(&path, false).is_err());
        Config::init(&path, true).unwrap();
        assert!(!Config::load_from(&path).unwrap().packages.strict);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[general]\npip = \"pip3\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.pip_command(), "pip3");
        assert_eq!(config.scaffold.starter, "standalone-datacatalog");
    }
}

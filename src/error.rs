//! Error types for sfp

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sfp operations
#[derive(Error, Debug)]
pub enum SfpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Python is not installed.")]
    PythonNotInstalled,

    #[error("Project name can't be empty")]
    EmptyProjectName,

    #[error("Failed to run `{command}`: {reason}")]
    Command { command: String, reason: String },

    #[error("An error occurred while trying to install the '{0}'.")]
    PackageInstall(String),

    #[error("Can't create Kedro project: {0}")]
    Kedro(String),

    #[error("Can't create the folder: {0}")]
    FolderCreation(String),

    #[error("Invalid entry point '{spec}': {reason}")]
    InvalidEntryPoint { spec: String, reason: String },

    #[error("Duplicate console script '{0}'")]
    DuplicateEntryPoint(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("README file not found: {path}")]
    MissingReadme { path: PathBuf },

    #[error("License file not found: {path}")]
    MissingLicense { path: PathBuf },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for sfp operations
pub type Result<T> = std::result::Result<T, SfpError>;

impl SfpError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a command failure error
    pub fn command(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid entry point error
    pub fn entry_point(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntryPoint {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

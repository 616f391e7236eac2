//! Command-line interface for sfp

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sfp - Simple Fast Project
///
/// Bootstrap a Kedro data-science project: checks Python, installs the
/// recommended packages and scaffolds the project folders.
#[derive(Parser, Debug)]
#[command(name = "sfp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (default: new)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SFP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project (prompts for the name when omitted)
    New(NewArgs),

    /// Check that python, pip and kedro are available
    Doctor(DoctorArgs),

    /// Audit (and optionally install) the recommended packages
    Packages(PackagesArgs),

    /// Build the launcher distribution from a package manifest
    Package(PackageArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the new command
#[derive(Parser, Debug, Clone, Default)]
pub struct NewArgs {
    /// Project (package) name
    pub name: Option<String>,

    /// Directory to create the project in (default: current directory)
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,

    /// Do not install missing packages
    #[arg(long)]
    pub skip_install: bool,

    /// Kedro starter to use instead of the configured one
    #[arg(long)]
    pub starter: Option<String>,

    /// Print a JSON summary when done
    #[arg(long)]
    pub json: bool,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable pretty output
    Pretty,
    /// JSON output
    Json,
}

/// Arguments for the doctor command
#[derive(Parser, Debug)]
pub struct DoctorArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,
}

/// Arguments for the packages command
#[derive(Parser, Debug)]
pub struct PackagesArgs {
    /// Install the missing packages
    #[arg(short, long)]
    pub install: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,
}

/// Arguments for the package command
#[derive(Parser, Debug)]
pub struct PackageArgs {
    /// Package subcommand
    #[command(subcommand)]
    pub command: PackageCommands,
}

/// Package subcommands
#[derive(Subcommand, Debug)]
pub enum PackageCommands {
    /// Write the default manifest
    Init {
        /// Manifest path
        #[arg(short, long, default_value = crate::models::MANIFEST_FILE)]
        manifest: PathBuf,
        /// Overwrite an existing manifest
        #[arg(short, long)]
        force: bool,
    },
    /// Build `<name>-<version>.tar.gz`
    Build {
        /// Manifest path
        #[arg(short, long, default_value = crate::models::MANIFEST_FILE)]
        manifest: PathBuf,
        /// Output directory (default: `dist` next to the manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only list what would be packaged
        #[arg(short, long)]
        list: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show the configuration file path
    Path,
    /// Edit configuration file
    Edit,
    /// Reset configuration to defaults
    Reset,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value (lists are comma separated)
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

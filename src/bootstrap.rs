//! The project bootstrap flow
//!
//! 1. detect the platform and the Python interpreter
//! 2. ask for (or take) the project name
//! 3. audit the recommended packages with `pip list`
//! 4. install whatever is missing
//! 5. create the Kedro project and its extra folders

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::env::{self, Pip, PythonEnv};
use crate::error::{SfpError, Result};
use crate::process::CommandRunner;
use crate::scaffold::{create_additional_folders, KedroStarter, ProjectName};
use crate::ui;

const NAME_PROMPT: &str = "Please enter the project name (package):";

/// Where the project name comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSource {
    /// Name passed on the command line
    Given(String),
    /// Ask on the terminal
    Prompt,
}

/// Knobs for a single bootstrap run
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Directory the project is created in
    pub workdir: PathBuf,
    /// Skip installing missing packages
    pub skip_install: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            skip_install: false,
        }
    }
}

/// State of the recommended packages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageAudit {
    /// Packages already installed
    pub present: Vec<String>,
    /// Packages that still need installing
    pub missing: Vec<String>,
}

/// Result of installing the missing packages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallOutcome {
    /// Packages installed by this run
    pub installed: Vec<String>,
    /// Packages pip failed to install
    pub failed: Vec<String>,
}

/// Summary of a finished bootstrap
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    /// Interpreter that was used
    pub python: PythonEnv,
    /// Name of the created project
    pub project: String,
    /// Project directory
    pub project_dir: PathBuf,
    /// Package audit before installing
    pub audit: PackageAudit,
    /// What the install step did
    pub install: InstallOutcome,
    /// Extra folders created in the project
    pub folders: Vec<PathBuf>,
}

/// Drives the bootstrap flow against a [`CommandRunner`]
pub struct Bootstrapper<'a, R: CommandRunner> {
    config: &'a Config,
    runner: R,
    is_unix: bool,
}

impl<'a, R: CommandRunner> Bootstrapper<'a, R> {
    /// Create a bootstrapper for the current platform
    pub fn new(config: &'a Config, runner: R) -> Self {
        Self {
            config,
            runner,
            is_unix: env::is_unix_os(),
        }
    }

    /// Pretend to run on a specific platform
    pub fn with_platform(mut self, is_unix: bool) -> Self {
        self.is_unix = is_unix;
        self
    }

    fn pip(&self) -> Pip {
        Pip::new(self.config.pip_command())
    }

    /// Run the whole flow
    pub fn run(&self, name: NameSource, opts: &BootstrapOptions) -> Result<BootstrapReport> {
        let python = self.check_python()?;
        let project = self.resolve_name(name)?;

        let audit = self.audit()?;
        let install = if opts.skip_install {
            ui::info("Skipping package installation");
            InstallOutcome::default()
        } else {
            self.install_missing(&audit.missing)?
        };

        let project_dir = self.create_project(&opts.workdir, &project)?;
        ui::info("Creating additional resources");
        let folders = create_additional_folders(&project_dir, &self.config.scaffold.extra_folders)?;

        Ok(BootstrapReport {
            python,
            project: project.to_string(),
            project_dir,
            audit,
            install,
            folders,
        })
    }

    /// Detect the interpreter and report its environment
    pub fn check_python(&self) -> Result<PythonEnv> {
        let command = self.config.python_command(self.is_unix);
        ui::info(format!("Is Unix: {}", self.is_unix));
        ui::info(format!("Using '{}' as python command", command));

        let python = PythonEnv::detect(&self.runner, &command)?;
        debug!("{} found", python.version);
        ui::info(format!(
            "The environment is: {}",
            python.prefix.as_deref().unwrap_or_default()
        ));
        Ok(python)
    }

    /// Turn the name source into a validated project name
    pub fn resolve_name(&self, source: NameSource) -> Result<ProjectName> {
        let raw = match source {
            NameSource::Given(name) => name,
            NameSource::Prompt => {
                ui::input(NAME_PROMPT);
                read_name()?
            }
        };

        let name = ProjectName::parse(&raw)?;
        ui::answer(format!("The project will be: {}", name));
        Ok(name)
    }

    /// Check which recommended packages are installed
    pub fn audit(&self) -> Result<PackageAudit> {
        let installed = self.pip().list(&self.runner)?;
        let mut audit = PackageAudit::default();

        for package in &self.config.packages.recommended {
            if installed.contains(package) {
                ui::info(format!("The '{}' package is already installed.", package));
                audit.present.push(package.clone());
            } else {
                ui::info(format!("The '{}' package is not installed.", package));
                audit.missing.push(package.clone());
            }
        }

        Ok(audit)
    }

    /// Install `missing`, continuing past failures unless configured strict
    pub fn install_missing(&self, missing: &[String]) -> Result<InstallOutcome> {
        let pip = self.pip();
        let mut outcome = InstallOutcome::default();

        for package in missing {
            ui::info(format!("Installing '{}'", package));
            match pip.install(&self.runner, package) {
                Ok(()) => {
                    ui::info(format!("The '{}' package has been successfully installed.", package));
                    outcome.installed.push(package.clone());
                }
                Err(e @ SfpError::PackageInstall(_)) if !self.config.packages.strict => {
                    warn!("{}", e);
                    ui::error(e.to_string());
                    outcome.failed.push(package.clone());
                }
                Err(e) => return Err(e),
            }
        }

        if outcome.failed.is_empty() {
            ui::good("All recommended packages are now installed!!");
        } else {
            ui::error(format!(
                "Some packages could not be installed: {}",
                outcome.failed.join(", ")
            ));
        }

        Ok(outcome)
    }

    /// Run `kedro new` and return the project directory
    pub fn create_project(&self, workdir: &Path, project: &ProjectName) -> Result<PathBuf> {
        let kedro = KedroStarter::new(
            self.config.scaffold.kedro.clone(),
            self.config.scaffold.starter.clone(),
        );
        kedro.create(&self.runner, workdir, project)?;
        ui::good(format!(
            "The project folder '{}' was created in the current path",
            project
        ));
        Ok(workdir.join(project))
    }
}

/// Read the project name from the terminal, or a plain line from piped stdin
fn read_name() -> Result<String> {
    if console::Term::stdout().is_term() && console::user_attended() {
        let name: String = dialoguer::Input::new()
            .allow_empty(true)
            .interact_text()?;
        Ok(name)
    } else {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

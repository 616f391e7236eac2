//! Command execution handlers

use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::bootstrap::{BootstrapOptions, Bootstrapper, NameSource};
use crate::config::Config;
use crate::error::{SfpError, Result};
use crate::process::SystemRunner;

/// Configuration shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,
    /// File the configuration was loaded from
    pub config_path: PathBuf,
    /// Suppress non-essential output
    pub quiet: bool,
}

impl Context {
    /// Load the configuration from `path` or the default location
    pub fn load(path: Option<&Path>, quiet: bool) -> Result<Self> {
        let config_path = Config::resolve_path(path)?;
        let config = Config::load_from(&config_path)?;
        Ok(Self { config, config_path, quiet })
    }
}

fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Execute the new command (also the default when no subcommand is given)
pub async fn execute_new(args: &super::NewArgs, ctx: &Context) -> Result<()> {
    if args.json {
        crate::ui::reserve_stdout();
    }
    let mut config = ctx.config.clone();
    if let Some(ref starter) = args.starter {
        config.scaffold.starter = starter.clone();
    }

    let workdir = match args.directory {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    if !workdir.is_dir() {
        return Err(SfpError::file_not_found(workdir));
    }

    let name = match args.name {
        Some(ref name) => NameSource::Given(name.clone()),
        None => NameSource::Prompt,
    };
    let opts = BootstrapOptions {
        workdir,
        skip_install: args.skip_install,
    };

    let report = Bootstrapper::new(&config, SystemRunner).run(name, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !ctx.quiet {
        println!();
        println!("{} {}", style("Project ready:").green().bold(), report.project_dir.display());
        if !report.install.failed.is_empty() {
            println!(
                "{} install manually: pip install {}",
                style("!").yellow().bold(),
                report.install.failed.join(" ")
            );
        }
    }

    Ok(())
}

/// Execute the doctor command
pub async fn execute_doctor(args: &super::DoctorArgs, ctx: &Context) -> Result<()> {
    let pb = spinner("Checking environment...", ctx.quiet || args.format == super::OutputFormat::Json);
    let report = crate::doctor::doctor(&ctx.config).await?;
    pb.finish_and_clear();

    match args.format {
        super::OutputFormat::Pretty => {
            println!("{}", style("Environment").bold().underlined());
            println!("  OS: {} (unix: {})", report.os, report.unix);
            println!();

            for check in &report.checks {
                let badge = match (check.passed, check.required) {
                    (true, _) => style("✓").green(),
                    (false, true) => style("✗").red(),
                    (false, false) => style("!").yellow(),
                };
                let detail = check
                    .version
                    .clone()
                    .or_else(|| check.message.clone())
                    .unwrap_or_default();
                println!("  {} {:<8} {}", badge, style(&check.name).bold(), detail);
                if let Some(ref path) = check.path {
                    println!("             {}", style(path.display()).dim());
                }
            }
        }
        super::OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if report.all_required_passed() {
        Ok(())
    } else {
        Err(SfpError::Other(format!(
            "{} required check(s) failed",
            report.required_failed_count()
        )))
    }
}

/// Execute the packages command
pub async fn execute_packages(args: &super::PackagesArgs, ctx: &Context) -> Result<()> {
    let json = args.format == super::OutputFormat::Json;
    if json {
        crate::ui::reserve_stdout();
    }
    let bootstrapper = Bootstrapper::new(&ctx.config, SystemRunner);

    let pb = spinner("Reading installed packages...", ctx.quiet || json);
    let audit = bootstrapper.audit();
    pb.finish_and_clear();
    let audit = audit?;

    let outcome = if args.install && !audit.missing.is_empty() {
        Some(bootstrapper.install_missing(&audit.missing)?)
    } else {
        None
    };

    match args.format {
        super::OutputFormat::Pretty => {
            println!(
                "{} present, {} missing",
                style(audit.present.len()).green(),
                style(audit.missing.len()).yellow()
            );
            if let Some(ref outcome) = outcome {
                println!(
                    "{} installed, {} failed",
                    style(outcome.installed.len()).green(),
                    style(outcome.failed.len()).red()
                );
            }
        }
        super::OutputFormat::Json => {
            let value = serde_json::json!({ "audit": audit, "install": outcome });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

/// Execute the package command
pub async fn execute_package(args: &super::PackageArgs, ctx: &Context) -> Result<()> {
    use crate::dist::DistributionBuilder;
    use crate::models::PackageManifest;

    match &args.command {
        super::PackageCommands::Init { manifest, force } => {
            PackageManifest::sfp().write(manifest, *force)?;
            println!("Wrote {}", manifest.display());
        }
        super::PackageCommands::Build { manifest, output, list } => {
            let package = PackageManifest::load(manifest)?;
            let root = match manifest.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let output_dir = output.clone().unwrap_or_else(|| root.join("dist"));
            let manifest_file = manifest
                .file_name()
                .map(PathBuf::from)
                .ok_or_else(|| SfpError::file_not_found(manifest))?;
            let builder = DistributionBuilder::new(package, &root)?
                .manifest_file(manifest_file)
                .exclude(&output_dir);

            if *list {
                let plan = builder.plan()?;
                println!("{}", style(&plan.dist_name).bold());
                for file in plan.files() {
                    println!("  {}", file.display());
                }
                return Ok(());
            }

            let pb = spinner("Building distribution...", ctx.quiet);
            let built = builder.build(&output_dir);
            pb.finish_and_clear();
            let built = built?;

            println!(
                "{} {} ({} entries)",
                style("Created").green().bold(),
                built.archive.display(),
                built.entries
            );
            if !ctx.quiet {
                println!("  sha256 {}", style(&built.sha256).dim());
            }
        }
    }

    Ok(())
}

/// Execute the config command
pub async fn execute_config(args: &super::ConfigArgs, ctx: &Context) -> Result<()> {
    let path = &ctx.config_path;

    match &args.command {
        super::ConfigCommands::Show => {
            println!("{}", toml::to_string_pretty(&ctx.config).map_err(|e| SfpError::config(e.to_string()))?);
        }
        super::ConfigCommands::Path => {
            println!("{}", path.display());
        }
        super::ConfigCommands::Edit => {
            if !path.exists() {
                Config::init(path, false)?;
            }
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());
            std::process::Command::new(editor)
                .arg(path)
                .status()?;
        }
        super::ConfigCommands::Reset => {
            Config::reset(path)?;
            println!("Configuration reset to defaults");
        }
        super::ConfigCommands::Set { key, value } => {
            let mut config = ctx.config.clone();
            config.set(key, value)?;
            config.save_to(path)?;
            println!("Set {} = {}", key, value);
        }
        super::ConfigCommands::Get { key } => {
            if !crate::config::KEYS.contains(&key.as_str()) {
                return Err(SfpError::config(crate::config::unknown_key_message(key)));
            }
            println!("{}", ctx.config.get(key).unwrap_or_default());
        }
        super::ConfigCommands::Init { force } => {
            Config::init(path, *force)?;
            println!("Configuration initialized");
        }
    }

    Ok(())
}

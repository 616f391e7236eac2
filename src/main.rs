//! sfp - Simple Fast Project
//!
//! Main entry point for the sfp CLI application.

use std::process::ExitCode;

use console::style;
use tracing_subscriber::EnvFilter;

use sfp::cli::{self, Cli, Commands, Context, NewArgs};
use sfp::error::Result;
use sfp::ui;

/// Application banner
const BANNER: &str = r#"
  ███████╗███████╗██████╗
  ██╔════╝██╔════╝██╔══██╗
  ███████╗█████╗  ██████╔╝
  ╚════██║██╔══╝  ██╔═══╝
  ███████║██║     ██║
  ╚══════╝╚═╝     ╚═╝
"#;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Configuration drives the default log level and colors
    let ctx = match Context::load(cli.config.as_deref(), cli.quiet) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    setup_logging(&cli, &ctx);
    ui::set_quiet(cli.quiet);

    match run(cli, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(format!("An error occurred: {}", e));
            ExitCode::FAILURE
        }
    }
}

/// Set up logging based on CLI arguments and configuration
fn setup_logging(cli: &Cli, ctx: &Context) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        ctx.config.logging.level.as_str()
    };

    if !ctx.config.logging.color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ctx.config.logging.color)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Main application logic
async fn run(cli: Cli, ctx: &Context) -> Result<()> {
    let command = cli.command.unwrap_or_else(|| Commands::New(NewArgs::default()));

    // Show banner when bootstrapping a project
    if !cli.quiet {
        if let Commands::New(ref args) = command {
            if !args.json {
                println!("{}", style(BANNER).cyan());
                println!("  {} v{}\n",
                    style("sfp").bold(),
                    style(sfp::VERSION).dim()
                );
            }
        }
    }

    // Dispatch to appropriate command handler
    match command {
        Commands::New(args) => {
            cli::execute_new(&args, ctx).await
        }
        Commands::Doctor(args) => {
            cli::execute_doctor(&args, ctx).await
        }
        Commands::Packages(args) => {
            cli::execute_packages(&args, ctx).await
        }
        Commands::Package(args) => {
            cli::execute_package(&args, ctx).await
        }
        Commands::Config(args) => {
            cli::execute_config(&args, ctx).await
        }
    }
}

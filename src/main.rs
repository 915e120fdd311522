//! docpreview - cached document previews
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use docpreview::cli::{Cli, Commands};
use docpreview::config::{Config, ConfigManager};
use docpreview::error::PreviewResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> PreviewResult<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::from_cli(cli.config);
    let config = config_manager.load_with_cache_dir(cli.cache_dir)?;

    init_logging(cli.verbose, &config);
    debug!("Using config file {}", config_manager.path().display());
    debug!("Using cache directory {}", ConfigManager::cache_dir(&config).display());

    match cli.command {
        Commands::Jpeg(args) => docpreview::cli::commands::jpeg(args, &config),
        Commands::Pdf(args) => docpreview::cli::commands::pdf(args, &config),
        Commands::Text(args) => docpreview::cli::commands::text(args, &config),
        Commands::Html(args) => docpreview::cli::commands::html(args, &config),
        Commands::Json(args) => docpreview::cli::commands::json(args, &config),
        Commands::Size(args) => docpreview::cli::commands::size(args, &config),
        Commands::Pages(args) => docpreview::cli::commands::pages(args, &config),
        Commands::Mimetype(args) => docpreview::cli::commands::mimetype(args, &config),
        Commands::Cache(args) => docpreview::cli::commands::cache(args, &config),
        Commands::Config(args) => docpreview::cli::commands::config(args, &config, &config_manager),
    }
}

/// Logs go to stderr so stdout only carries command output.
/// 0 = warn, 1 = info, 2+ = debug; `general.verbose` counts as one `-v`.
fn init_logging(verbose: u8, config: &Config) {
    let level = verbose.max(u8::from(config.general.verbose));
    let filter = match level {
        0 => EnvFilter::new("docpreview=warn"),
        1 => EnvFilter::new("docpreview=info"),
        _ => EnvFilter::new("docpreview=debug"),
    };

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }
}

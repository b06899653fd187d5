//! Sharecard - social preview cards and metadata for a travel-planning site.

mod batch;
mod cache;
mod cli;
mod config;
mod content;
mod core;
mod logger;
mod meta;
mod render;
mod server;
mod trip;
mod utils;

use std::process::ExitCode;

use clap::{ColorChoice, Parser, error::ErrorKind};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            err.print().ok();
            return code;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let config = SiteConfig::load(cli)?;

    match &cli.command {
        Commands::Build { args } => cli::build::build_cards(&config, args),
        Commands::Validate => cli::validate::validate_manifest(&config),
        Commands::Serve { .. } => cli::serve::serve(config),
        Commands::Render { path, output, .. } => cli::render::render_route(&config, path, output),
        Commands::Meta { path } => cli::meta::print_meta(&config, path),
    }
}

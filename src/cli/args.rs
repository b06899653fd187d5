//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, builder::NonEmptyStringValueParser};
use std::path::PathBuf;

use crate::config::CompositorKind;

/// Social preview card pipeline
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sharecard.toml)
    #[arg(short = 'C', long, global = true, default_value = "sharecard.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Pre-render share cards and update the manifest
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Check the manifest against a fresh computation (read-only)
    #[command(visible_alias = "v")]
    Validate,

    /// Serve share cards and metadata on demand
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render the card for one route to a PNG file
    #[command(visible_alias = "r")]
    Render {
        /// Route path, optionally with a query (e.g. /de/features)
        path: String,

        /// Output file
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,

        /// Compositor override (vector, on-demand)
        #[arg(long, value_enum)]
        compositor: Option<CompositorKind>,
    },

    /// Print canonical metadata for a route as JSON
    #[command(visible_alias = "m")]
    Meta {
        /// Route path, optionally with a query (e.g. /de/features)
        path: String,
    },
}

/// Target filters and pool size for `build`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Only targets whose content locale is listed (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = NonEmptyStringValueParser::new())]
    pub locales: Vec<String>,

    /// Only these exact paths (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = NonEmptyStringValueParser::new())]
    pub include_paths: Vec<String>,

    /// Only paths under these prefixes (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = NonEmptyStringValueParser::new())]
    pub include_prefixes: Vec<String>,

    /// Skip these exact paths (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = NonEmptyStringValueParser::new())]
    pub exclude_paths: Vec<String>,

    /// Skip paths under these prefixes (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = NonEmptyStringValueParser::new())]
    pub exclude_prefixes: Vec<String>,

    /// Render workers (1-16, default 4)
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, error::ErrorKind};

    #[test]
    fn test_build_filters() {
        let cli = Cli::try_parse_from([
            "sharecard",
            "build",
            "--locales=de,fr",
            "--include-prefixes=/blog",
            "--concurrency=8",
        ])
        .unwrap();
        let Commands::Build { args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.locales, ["de", "fr"]);
        assert_eq!(args.include_prefixes, ["/blog"]);
        assert!(args.exclude_paths.is_empty());
        assert_eq!(args.concurrency, Some(8));
    }

    #[test]
    fn test_rejects_unknown_and_empty_flags() {
        let err = Cli::try_parse_from(["sharecard", "build", "--colour=red"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        assert!(Cli::try_parse_from(["sharecard", "build", "--locales="]).is_err());

        assert!(Cli::try_parse_from(["sharecard", "build", "--concurrency"]).is_err());
        assert!(Cli::try_parse_from(["sharecard", "build", "--concurrency=many"]).is_err());
    }

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();

        let err = Cli::try_parse_from(["sharecard", "-V"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_render_args() {
        let cli = Cli::try_parse_from([
            "sharecard",
            "-v",
            "render",
            "/de/features",
            "-o",
            "card.png",
            "--compositor",
            "on-demand",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Render { path, output, compositor } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(path, "/de/features");
        assert_eq!(output, PathBuf::from("card.png"));
        assert_eq!(compositor, Some(CompositorKind::OnDemand));
    }
}

//! tdocs CLI - tetris-discord documentation site.
//!
//! Provides commands for:
//! - `serve`: Serve the site directory for local testing
//! - `view`: Render a route headlessly and print the HTML

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ServeArgs, ViewArgs};
use output::Output;

/// tdocs - tetris-discord documentation site.
#[derive(Parser)]
#[command(name = "tdocs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site directory.
    Serve(ServeArgs),
    /// Render a site route and print its HTML.
    View(ViewArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Serve(args) => args.verbose,
        Commands::View(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async {
        match cli.command {
            Commands::Serve(args) => args.execute().await,
            Commands::View(args) => args.execute().await,
        }
    });

    if let Err(err) = result {
        output.error(&err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_view_requires_path() {
        assert!(Cli::try_parse_from(["tdocs", "view"]).is_err());
        assert!(Cli::try_parse_from(["tdocs", "view", "#/index", "--wait-persist"]).is_ok());
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(["tdocs", "serve", "--port", "9000", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve(args) if args.verbose));
    }
}

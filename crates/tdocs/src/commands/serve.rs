//! `tdocs serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use tdocs_config::{CliSettings, Config};
use tdocs_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover tdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site directory to serve (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            site_dir: self.site_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.serving(&config.site_dir, &config.server.host, config.server.port);

        run_server(ServerConfig::from(&config)).await?;

        Ok(())
    }
}

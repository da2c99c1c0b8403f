//! CLI error types.

use tdocs_config::ConfigError;
use tdocs_server::ServerError;
use tdocs_site::AppError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Navigation(#[from] AppError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

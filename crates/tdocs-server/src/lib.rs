//! Development server for the tdocs site.
//!
//! Serves the site directory over HTTP. Its main consumer is `tdocs view`,
//! whose HTTP content store fetches `/pages/{id}.md` from here. The shipped
//! `index.html` is an empty mount point: pages are rendered by the
//! `tdocs-site` runtime, not in the browser.
//!
//! Routing rules:
//! - existing files are served with a content type from their extension
//! - extension-less paths that match no file fall back to `index.html`
//! - anything else that is missing is a 404, including `/pages/*.md`
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use tdocs_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 8080,
//!         site_dir: PathBuf::from("site"),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

pub use error::ServerError;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory served as the site root.
    pub site_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            site_dir: PathBuf::from("site"),
        }
    }
}

impl ServerConfig {
    /// Address to bind, `host:port`.
    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|source| ServerError::InvalidAddress { addr, source })
    }
}

impl From<&tdocs_config::Config> for ServerConfig {
    fn from(config: &tdocs_config::Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            site_dir: config.site_dir.clone(),
        }
    }
}

/// Run the server until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.addr()?;
    if !config.site_dir.is_dir() {
        return Err(ServerError::SiteDirNotFound(config.site_dir));
    }

    let state = Arc::new(AppState {
        site_dir: config.site_dir,
    });
    let app = app::create_router(&state);

    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

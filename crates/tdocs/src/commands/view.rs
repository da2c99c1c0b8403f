//! `tdocs view` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tdocs_config::{CliSettings, Config};
use tdocs_site::{App, FileStorage, IndexLink, SiteContext, VisitState};
use tdocs_storage::{ContentStore, FsStore, HttpStore};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the view command.
#[derive(Args)]
pub(crate) struct ViewArgs {
    /// Route to open, e.g. `/docs/quickstart` or `#/index`.
    path: String,

    /// Path to configuration file (default: auto-discover tdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content server base URL (overrides config).
    #[arg(long, env = "TDOCS_BASE_URL")]
    base_url: Option<String>,

    /// Read pages from the site directory instead of over HTTP.
    #[arg(long)]
    local: bool,

    /// Site directory used with --local (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// File holding the visit flag (overrides config).
    #[arg(long)]
    storage_file: Option<PathBuf>,

    /// Stay alive until the visit flag has been written.
    #[arg(long)]
    wait_persist: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ViewArgs {
    /// Execute the view command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir,
            base_url: self.base_url,
            storage_file: self.storage_file,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let store: Arc<dyn ContentStore> = if self.local {
            Arc::new(FsStore::new(&config.site_dir))
        } else {
            Arc::new(HttpStore::new(&config.content.base_url))
        };
        let visit = VisitState::load(Arc::new(FileStorage::new(
            &config.visit_resolved.storage_file,
        )));
        let index = config
            .index
            .iter()
            .map(|entry| IndexLink::new(&entry.title, &entry.page))
            .collect();

        let mut app = App::new(SiteContext::new(store, visit).with_index(index));
        let persist = app.schedule_visit_persist(config.visit_resolved.persist_delay);

        tracing::info!(path = %self.path, local = self.local, "Opening route");
        app.push(&self.path)?;
        app.settle().await?;

        output.rendered(app.current_path().unwrap_or("/"));
        if let Some(html) = app.render() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }

        if self.wait_persist {
            output.waiting_for_visit(config.visit_resolved.persist_delay);
            persist.await?;
            output.visit_recorded();
        }

        Ok(())
    }
}

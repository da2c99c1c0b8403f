//! Application state.

use std::path::PathBuf;

/// State shared across all handlers.
pub(crate) struct AppState {
    /// Directory served as the site root.
    pub(crate) site_dir: PathBuf,
}

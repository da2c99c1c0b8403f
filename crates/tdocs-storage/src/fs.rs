//! Filesystem content store.
//!
//! Reads `{root}/pages/{id}.md` from a local site directory.

use std::fs;
use std::path::PathBuf;

use crate::store::{ContentStore, PageId, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Content store backed by a site directory on disk.
///
/// Page ids become a single file name, so ids that contain path separators
/// or parent references are rejected with [`StorageErrorKind::InvalidPath`].
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at the site directory (the parent of `pages/`).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentStore for FsStore {
    fn fetch(&self, page: &PageId) -> Result<String, StorageError> {
        let slug = page.as_str();
        if slug.is_empty() || slug == ".." || slug.contains(['/', '\\', '\0']) {
            return Err(StorageError::fetching(
                StorageErrorKind::InvalidPath,
                BACKEND,
                page,
            ));
        }

        let path = self.root.join("pages").join(format!("{slug}.md"));
        fs::read_to_string(&path)
            .map_err(|e| StorageError::fetching(e.kind().into(), BACKEND, page).with_source(e))
    }
}

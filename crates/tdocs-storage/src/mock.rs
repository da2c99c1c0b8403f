//! Mock content store for testing.
//!
//! Provides [`MockStore`] for exercising page loading without a network or
//! filesystem.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::thread;
use std::time::Duration;

use crate::store::{ContentStore, PageId, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock content store.
///
/// Stores pages in memory. Use the builder methods to configure pages,
/// injected failures, and artificial latency.
///
/// # Example
///
/// ```ignore
/// use tdocs_storage::{ContentStore, MockStore, PageId, StorageErrorKind};
///
/// let store = MockStore::new()
///     .with_page("quickstart", "# Hi\n")
///     .with_failure("broken", StorageErrorKind::Status(500));
///
/// assert_eq!(store.fetch(&PageId::new("quickstart")).unwrap(), "# Hi\n");
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    pages: RwLock<HashMap<String, String>>,
    failures: RwLock<HashMap<String, StorageErrorKind>>,
    delays: RwLock<HashMap<String, Duration>>,
    fetched: Mutex<Vec<String>>,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page with the given markdown.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, slug: impl Into<String>, markdown: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(slug.into(), markdown.into());
        self
    }

    /// Make fetches of `slug` fail with `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, slug: impl Into<String>, kind: StorageErrorKind) -> Self {
        self.failures.write().unwrap().insert(slug.into(), kind);
        self
    }

    /// Block fetches of `slug` for `delay` before answering.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_delay(self, slug: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(slug.into(), delay);
        self
    }

    /// Slugs fetched so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl ContentStore for MockStore {
    fn fetch(&self, page: &PageId) -> Result<String, StorageError> {
        let slug = page.as_str();
        self.fetched.lock().unwrap().push(slug.to_owned());

        let delay = self.delays.read().unwrap().get(slug).copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        if let Some(kind) = self.failures.read().unwrap().get(slug) {
            return Err(StorageError::fetching(*kind, BACKEND, page));
        }

        self.pages
            .read()
            .unwrap()
            .get(slug)
            .cloned()
            .ok_or_else(|| StorageError::fetching(StorageErrorKind::NotFound, BACKEND, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_configured_page() {
        let store = MockStore::new().with_page("quickstart", "# Hi\n");

        assert_eq!(store.fetch(&PageId::new("quickstart")).unwrap(), "# Hi\n");
    }

    #[test]
    fn test_fetch_unknown_page_is_not_found() {
        let store = MockStore::new();

        let err = store.fetch(&PageId::new("missing")).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "[Mock] page `missing`: not found");
    }

    #[test]
    fn test_failure_overrides_page() {
        let store = MockStore::new()
            .with_page("flaky", "content")
            .with_failure("flaky", StorageErrorKind::Unavailable);

        let err = store.fetch(&PageId::new("flaky")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::Unavailable);
    }

    #[test]
    fn test_records_every_fetch() {
        let store = MockStore::new().with_page("a", "");

        let _ = store.fetch(&PageId::new("a"));
        let _ = store.fetch(&PageId::new("b"));
        let _ = store.fetch(&PageId::new("a"));

        assert_eq!(store.fetched(), vec!["a", "b", "a"]);
    }
}

//! Content store trait and error types.
//!
//! Provides the core [`ContentStore`] trait for fetching page markdown,
//! along with [`StorageError`] for unified error handling across backends.

use std::fmt;

/// Identifier of a documentation page, taken verbatim from the route.
///
/// The id is interpolated into the content path without further
/// normalization: `quickstart` lives at `/pages/quickstart.md`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    /// Create a page id from a slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of raw page markdown.
///
/// Implementations are synchronous; async callers run them on a blocking
/// thread.
pub trait ContentStore: Send + Sync {
    /// Fetch the raw markdown of a page.
    ///
    /// Returns [`StorageErrorKind::NotFound`] when the store has no such page.
    /// Every other failure is reported with its own kind.
    fn fetch(&self, page: &PageId) -> Result<String, StorageError>;
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Page does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Page id cannot be mapped to a location inside the store.
    InvalidPath,
    /// Backend could not be reached.
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Backend answered with an unexpected HTTP status.
    Status(u16),
    /// Other/unknown error category.
    Other,
}

impl StorageErrorKind {
    fn describe(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("not found"),
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::InvalidPath => f.write_str("invalid page id"),
            Self::Unavailable => f.write_str("store unavailable"),
            Self::Timeout => f.write_str("timed out"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Other => f.write_str("error"),
        }
    }
}

impl From<std::io::ErrorKind> for StorageErrorKind {
    fn from(kind: std::io::ErrorKind) -> Self {
        match kind {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            std::io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Other,
        }
    }
}

/// Failure to fetch a page.
///
/// Displays as `[Backend] page `id`: kind: source`, omitting the parts
/// that are not known.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Page the fetch was for.
    pub page: Option<PageId>,
    /// Backend identifier (e.g., "Http", "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Error without page or backend context.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            page: None,
            backend: None,
            source: None,
        }
    }

    /// Error raised by `backend` while fetching `page`.
    #[must_use]
    pub fn fetching(kind: StorageErrorKind, backend: &'static str, page: &PageId) -> Self {
        Self {
            kind,
            page: Some(page.clone()),
            backend: Some(backend),
            source: None,
        }
    }

    /// Attach the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// True when the page is missing rather than the store failing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        if let Some(page) = &self.page {
            write!(f, "page `{page}`: ")?;
        }
        self.kind.describe(f)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_full_context() {
        let err = StorageError::fetching(StorageErrorKind::NotFound, "Http", &PageId::new("missing"));
        assert_eq!(err.to_string(), "[Http] page `missing`: not found");
    }

    #[test]
    fn test_display_status_kind() {
        let err = StorageError::new(StorageErrorKind::Status(503));
        assert_eq!(err.to_string(), "HTTP status 503");
    }

    #[test]
    fn test_display_with_source() {
        let io = std::io::Error::other("disk on fire");
        let err = StorageError::fetching(io.kind().into(), "Fs", &PageId::new("commands"))
            .with_source(io);
        assert_eq!(err.to_string(), "[Fs] page `commands`: error: disk on fire");
    }

    #[test]
    fn test_io_error_kind_mapping() {
        let cases = [
            (std::io::ErrorKind::NotFound, StorageErrorKind::NotFound),
            (
                std::io::ErrorKind::PermissionDenied,
                StorageErrorKind::PermissionDenied,
            ),
            (std::io::ErrorKind::TimedOut, StorageErrorKind::Timeout),
            (std::io::ErrorKind::InvalidData, StorageErrorKind::Other),
        ];
        for (io_kind, expected) in cases {
            assert_eq!(StorageErrorKind::from(io_kind), expected, "{io_kind:?}");
        }
    }

    #[test]
    fn test_is_not_found() {
        assert!(StorageError::new(StorageErrorKind::NotFound).is_not_found());
        assert!(!StorageError::new(StorageErrorKind::Unavailable).is_not_found());
    }
}

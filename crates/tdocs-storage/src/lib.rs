//! Content store abstraction for tdocs.
//!
//! This crate provides the [`ContentStore`] trait: given a [`PageId`], return
//! the raw markdown stored at `/pages/{id}.md`. Failures carry a semantic
//! [`StorageErrorKind`] so callers can tell a missing page apart from a
//! broken store.
//!
//! # Backends
//!
//! - [`HttpStore`]: `GET {base_url}/pages/{id}.md` over HTTP
//! - [`FsStore`]: `{root}/pages/{id}.md` on the local filesystem
//! - [`MockStore`]: in-memory pages for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use tdocs_storage::{ContentStore, HttpStore, PageId};
//!
//! let store = HttpStore::new("http://127.0.0.1:8080");
//! let markdown = store.fetch(&PageId::new("quickstart"))?;
//! ```

mod fs;
mod http;
#[cfg(feature = "mock")]
mod mock;
mod store;

pub use fs::FsStore;
pub use http::HttpStore;
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use store::{ContentStore, PageId, StorageError, StorageErrorKind};

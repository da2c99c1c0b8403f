//! Client runtime for the tdocs documentation site.
//!
//! Resolves navigation targets against the [`RouteTable`], mounts the
//! matching page, loads markdown documents from a
//! [`ContentStore`](tdocs_storage::ContentStore) and renders the result
//! to HTML.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use tdocs_site::{App, MemoryStorage, SiteContext, VisitState};
//! use tdocs_storage::FsStore;
//!
//! let visit = VisitState::load(Arc::new(MemoryStorage::new()));
//! let ctx = SiteContext::new(Arc::new(FsStore::new("site")), visit);
//! let mut app = App::new(ctx);
//!
//! app.push("#/docs/quickstart")?;
//! app.settle().await?;
//! println!("{}", app.render().unwrap_or_default());
//! ```

mod app;
mod context;
mod history;
mod pages;
mod router;
mod view;
mod visit;

pub use app::{App, AppError};
pub use context::{
    ChangelogCaps, CommitSummary, DocCaps, HomeCaps, IndexCaps, IndexLink, SiteContext,
};
pub use history::{History, NavigationKind, Transition};
pub use pages::{
    ChangelogPage, DocPage, DocState, Effect, Greeting, HomePage, IndexPage, NotFoundPage, Page,
};
pub use router::{NOT_FOUND_PATH, PageKind, Route, RouteError, RouteMatch, RouteTable, normalize_path};
pub use view::{View, render};
pub use visit::{
    DEFAULT_PERSIST_DELAY, FIRST_VISIT_KEY, FIRST_VISIT_VALUE, FileStorage, LocalStorage,
    MemoryStorage, StorageWriteError, VisitState,
};

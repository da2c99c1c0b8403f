//! Site runtime.
//!
//! [`App`] owns the navigation history and the mounted page. Every
//! navigation tears down the current page and mounts a fresh instance with
//! a new id. Document fetches run on the blocking pool and report back over
//! a channel tagged with the id of the instance that started them; results
//! for an instance that is no longer mounted are dropped.

use std::time::Duration;

use tdocs_storage::{PageId, StorageError, StorageErrorKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::context::SiteContext;
use crate::history::{History, NavigationKind};
use crate::pages::{DocState, Effect, Page};
use crate::router::{RouteTable, normalize_path};
use crate::view;

/// Error driving the runtime.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AppError {
    /// No route matched and the table has no catch-all.
    #[error("no route matches {0}")]
    NoRoute(String),
}

struct FetchEvent {
    instance: u64,
    outcome: Result<String, StorageError>,
}

struct Mounted {
    id: u64,
    page: Page,
    task: Option<JoinHandle<()>>,
}

/// Single-threaded site runtime.
///
/// Navigation methods spawn tasks and must be called inside a Tokio
/// runtime.
pub struct App {
    routes: RouteTable,
    ctx: SiteContext,
    history: History,
    mounted: Option<Mounted>,
    next_instance: u64,
    events_tx: mpsc::UnboundedSender<FetchEvent>,
    events_rx: mpsc::UnboundedReceiver<FetchEvent>,
}

impl App {
    /// Runtime over the site's route table.
    #[must_use]
    pub fn new(ctx: SiteContext) -> Self {
        Self::with_routes(RouteTable::site(), ctx)
    }

    /// Runtime over a custom route table.
    #[must_use]
    pub fn with_routes(routes: RouteTable, ctx: SiteContext) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            routes,
            ctx,
            history: History::new(),
            mounted: None,
            next_instance: 0,
            events_tx,
            events_rx,
        }
    }

    /// Schedule the delayed first-visit write.
    pub fn schedule_visit_persist(&self, delay: Duration) -> JoinHandle<()> {
        self.ctx.visit().schedule_persist(delay)
    }

    /// Navigate to `target`, adding a history entry.
    pub fn push(&mut self, target: &str) -> Result<(), AppError> {
        self.navigate(target, NavigationKind::Push)
    }

    /// Navigate to `target`, replacing the current entry.
    pub fn replace(&mut self, target: &str) -> Result<(), AppError> {
        self.navigate(target, NavigationKind::Replace)
    }

    /// Go back one entry. Returns `false` when already at the first entry.
    pub fn back(&mut self) -> Result<bool, AppError> {
        if self.history.back().is_none() {
            return Ok(false);
        }
        self.mount_current()?;
        Ok(true)
    }

    #[must_use]
    pub fn current_path(&self) -> Option<&str> {
        self.history.current()
    }

    #[must_use]
    pub fn page(&self) -> Option<&Page> {
        self.mounted.as_ref().map(|m| &m.page)
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// HTML of the mounted page.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.page().map(|page| view::render(&page.view()))
    }

    /// True while the mounted page waits for its fetch.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.page(), Some(Page::Doc(doc)) if *doc.state() == DocState::Loading)
    }

    /// Apply every fetch result already delivered, without waiting.
    ///
    /// Returns the number of events taken from the queue.
    pub fn process_pending(&mut self) -> Result<usize, AppError> {
        let mut count = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event)?;
            count += 1;
        }
        Ok(count)
    }

    /// Wait until the mounted page is no longer loading.
    pub async fn settle(&mut self) -> Result<(), AppError> {
        while self.is_loading() {
            let Some(event) = self.events_rx.recv().await else {
                break;
            };
            self.apply(event)?;
        }
        Ok(())
    }

    fn navigate(&mut self, target: &str, kind: NavigationKind) -> Result<(), AppError> {
        let path = normalize_path(target);
        match kind {
            NavigationKind::Push => self.history.push(path),
            NavigationKind::Replace => self.history.replace(path),
            NavigationKind::Back => {}
        }
        self.mount_current()
    }

    /// Mount the page for the current history entry, following replaces.
    fn mount_current(&mut self) -> Result<(), AppError> {
        let mut path = self.history.current().unwrap_or("/").to_owned();
        loop {
            let route = self
                .routes
                .resolve(&path)
                .ok_or_else(|| AppError::NoRoute(path.clone()))?;

            self.teardown();
            let id = self.next_instance;
            self.next_instance += 1;

            let (page, effect) = Page::mount(&route, &self.ctx);
            tracing::debug!(path = %path, instance = id, kind = ?page.kind(), "Mounted page");
            let mut mounted = Mounted {
                id,
                page,
                task: None,
            };

            match effect {
                Effect::None => {}
                Effect::Fetch(page_id) => mounted.task = Some(self.spawn_fetch(id, page_id)),
                Effect::Replace(to) => {
                    self.mounted = Some(mounted);
                    self.history.replace(to.clone());
                    path = to;
                    continue;
                }
            }
            self.mounted = Some(mounted);
            return Ok(());
        }
    }

    fn teardown(&mut self) {
        if let Some(mounted) = self.mounted.take()
            && let Some(task) = mounted.task
        {
            task.abort();
        }
    }

    fn spawn_fetch(&self, instance: u64, page: PageId) -> JoinHandle<()> {
        let store = self.ctx.doc_caps().store;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = tokio::task::spawn_blocking(move || store.fetch(&page))
                .await
                .unwrap_or_else(|e| Err(StorageError::new(StorageErrorKind::Other).with_source(e)));
            // Receiver lives as long as the app
            let _ = tx.send(FetchEvent { instance, outcome });
        })
    }

    fn apply(&mut self, event: FetchEvent) -> Result<(), AppError> {
        let renderer = self.ctx.doc_caps().renderer;
        let effect = match self.mounted.as_mut() {
            Some(Mounted {
                id,
                page: Page::Doc(doc),
                ..
            }) if *id == event.instance => doc.resolve(event.outcome, &renderer),
            _ => {
                tracing::debug!(instance = event.instance, "Discarding stale fetch result");
                return Ok(());
            }
        };

        match effect {
            Effect::Replace(to) => {
                self.history.replace(to);
                self.mount_current()
            }
            Effect::None | Effect::Fetch(_) => Ok(()),
        }
    }
}

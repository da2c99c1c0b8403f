//! Page components.
//!
//! A page is mounted from a [`RouteMatch`] and the capabilities it needs,
//! and returns the [`Effect`] the runtime must perform. Document pages are
//! the only stateful ones: they start [`DocState::Loading`] and move to a
//! final state exactly once when the fetch outcome is delivered.

use rand::RngExt;
use tdocs_renderer::MarkdownRenderer;
use tdocs_storage::{PageId, StorageError, StorageErrorKind};

use crate::context::{
    ChangelogCaps, CommitSummary, HomeCaps, IndexCaps, IndexLink, SiteContext,
};
use crate::router::{NOT_FOUND_PATH, PageKind, RouteMatch};
use crate::view::View;

/// Side effect requested by a page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Replace the current history entry with this path.
    Replace(String),
    /// Fetch this page's markdown and deliver the outcome to the page.
    Fetch(PageId),
}

/// Greeting shown on the home page, e.g. `hey :D`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Greeting {
    word: &'static str,
    face: &'static str,
}

impl Greeting {
    pub const WORDS: [&'static str; 3] = ["hi", "hey", "hello"];
    pub const FACES: [&'static str; 2] = [":D", ":O"];

    /// Pick a word and a face at random.
    #[must_use]
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self::from_indices(
            rng.random_range(0..Self::WORDS.len()),
            rng.random_range(0..Self::FACES.len()),
        )
    }

    /// Greeting from explicit indices (wrapped into range).
    #[must_use]
    pub fn from_indices(word: usize, face: usize) -> Self {
        Self {
            word: Self::WORDS[word % Self::WORDS.len()],
            face: Self::FACES[face % Self::FACES.len()],
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        format!("{} {}", self.word, self.face)
    }
}

/// Landing page.
#[derive(Clone, Debug)]
pub struct HomePage {
    greeting: Greeting,
    first_visit: bool,
}

impl HomePage {
    #[must_use]
    pub fn mount(caps: HomeCaps) -> Self {
        Self {
            greeting: Greeting::random(),
            first_visit: caps.first_visit,
        }
    }

    #[must_use]
    pub fn with_greeting(mut self, greeting: Greeting) -> Self {
        self.greeting = greeting;
        self
    }
}

/// Documentation index.
#[derive(Clone, Debug)]
pub struct IndexPage {
    entries: Vec<IndexLink>,
}

impl IndexPage {
    #[must_use]
    pub fn mount(caps: IndexCaps) -> Self {
        Self {
            entries: caps.entries,
        }
    }
}

/// Changelog.
#[derive(Clone, Debug)]
pub struct ChangelogPage {
    commits: Vec<CommitSummary>,
}

impl ChangelogPage {
    #[must_use]
    pub fn mount(caps: ChangelogCaps) -> Self {
        Self {
            commits: caps.commits,
        }
    }
}

/// Not-found page.
#[derive(Clone, Debug)]
pub struct NotFoundPage {
    path: String,
}

impl NotFoundPage {
    /// Mount on `path`, canonicalizing it to `/404` if needed.
    #[must_use]
    pub fn mount(path: &str) -> (Self, Effect) {
        let effect = if path == NOT_FOUND_PATH {
            Effect::None
        } else {
            Effect::Replace(NOT_FOUND_PATH.to_owned())
        };
        (
            Self {
                path: path.to_owned(),
            },
            effect,
        )
    }

    /// Path the page was mounted on.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Lifecycle of a document page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocState {
    /// Fetch in flight.
    Loading,
    /// Markdown fetched and rendered.
    Rendered(String),
    /// Page does not exist; a replace to `/404` was requested.
    RedirectPending,
    /// Fetch failed for a reason other than not-found.
    Failed(String),
}

/// Page rendering a markdown document from the content store.
#[derive(Clone, Debug)]
pub struct DocPage {
    page: PageId,
    state: DocState,
}

impl DocPage {
    /// Mount in the loading state. The returned effect fetches the page.
    #[must_use]
    pub fn mount(page: PageId) -> (Self, Effect) {
        let effect = Effect::Fetch(page.clone());
        (
            Self {
                page,
                state: DocState::Loading,
            },
            effect,
        )
    }

    #[must_use]
    pub fn page(&self) -> &PageId {
        &self.page
    }

    #[must_use]
    pub fn state(&self) -> &DocState {
        &self.state
    }

    /// Apply the fetch outcome.
    ///
    /// Only a page still loading changes state; later outcomes are ignored.
    pub fn resolve(
        &mut self,
        outcome: Result<String, StorageError>,
        renderer: &MarkdownRenderer,
    ) -> Effect {
        if self.state != DocState::Loading {
            tracing::debug!(page = %self.page, "Ignoring fetch outcome for settled page");
            return Effect::None;
        }

        match outcome {
            Ok(markdown) => {
                self.state = DocState::Rendered(renderer.render(&markdown));
                Effect::None
            }
            Err(e) if e.is_not_found() || e.kind == StorageErrorKind::InvalidPath => {
                tracing::debug!(page = %self.page, "Page not found: {e}");
                self.state = DocState::RedirectPending;
                Effect::Replace(NOT_FOUND_PATH.to_owned())
            }
            Err(e) => {
                tracing::warn!(page = %self.page, "Failed to load page: {e}");
                self.state = DocState::Failed(e.to_string());
                Effect::None
            }
        }
    }
}

/// A mounted page.
#[derive(Clone, Debug)]
pub enum Page {
    Home(HomePage),
    Index(IndexPage),
    Doc(DocPage),
    Changelog(ChangelogPage),
    NotFound(NotFoundPage),
}

impl Page {
    /// Mount the page a route resolved to.
    #[must_use]
    pub fn mount(route: &RouteMatch, ctx: &SiteContext) -> (Self, Effect) {
        match route.page {
            PageKind::Home => (Self::Home(HomePage::mount(ctx.home_caps())), Effect::None),
            PageKind::Index => (
                Self::Index(IndexPage::mount(ctx.index_caps())),
                Effect::None,
            ),
            PageKind::Changelog => (
                Self::Changelog(ChangelogPage::mount(ctx.changelog_caps())),
                Effect::None,
            ),
            PageKind::Doc => match route.param("page") {
                Some(slug) => {
                    let (page, effect) = DocPage::mount(PageId::new(slug));
                    (Self::Doc(page), effect)
                }
                None => {
                    let (page, effect) = NotFoundPage::mount(&route.path);
                    (Self::NotFound(page), effect)
                }
            },
            PageKind::NotFound => {
                let (page, effect) = NotFoundPage::mount(&route.path);
                (Self::NotFound(page), effect)
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> PageKind {
        match self {
            Self::Home(_) => PageKind::Home,
            Self::Index(_) => PageKind::Index,
            Self::Doc(_) => PageKind::Doc,
            Self::Changelog(_) => PageKind::Changelog,
            Self::NotFound(_) => PageKind::NotFound,
        }
    }

    /// What to display.
    #[must_use]
    pub fn view(&self) -> View<'_> {
        match self {
            Self::Home(home) => View::Home {
                greeting: home.greeting.text(),
                first_visit: home.first_visit,
            },
            Self::Index(index) => View::Index {
                entries: &index.entries,
            },
            Self::Doc(doc) => match &doc.state {
                DocState::Loading | DocState::RedirectPending => View::Loading,
                DocState::Rendered(html) => View::Document { html },
                DocState::Failed(message) => View::Failed {
                    page: doc.page.as_str(),
                    message,
                },
            },
            Self::Changelog(changelog) => View::Changelog {
                commits: &changelog.commits,
            },
            Self::NotFound(_) => View::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use tdocs_storage::MockStore;

    use super::*;
    use crate::router::RouteTable;
    use crate::visit::{MemoryStorage, VisitState};

    fn context() -> SiteContext {
        SiteContext::new(
            Arc::new(MockStore::new()),
            VisitState::load(Arc::new(MemoryStorage::new())),
        )
    }

    fn mount(path: &str) -> (Page, Effect) {
        let route = RouteTable::site().resolve(path).unwrap();
        Page::mount(&route, &context())
    }

    #[test]
    fn test_greeting_from_indices() {
        assert_eq!(Greeting::from_indices(0, 0).text(), "hi :D");
        assert_eq!(Greeting::from_indices(2, 1).text(), "hello :O");
        assert_eq!(Greeting::from_indices(4, 3).text(), "hey :O");
    }

    #[test]
    fn test_random_greeting_is_valid() {
        for _ in 0..20 {
            let text = Greeting::random().text();
            let (word, face) = text.split_once(' ').unwrap();
            assert!(Greeting::WORDS.contains(&word), "{text}");
            assert!(Greeting::FACES.contains(&face), "{text}");
        }
    }

    #[test]
    fn test_home_view() {
        let caps = HomeCaps { first_visit: false };
        let page = Page::Home(HomePage::mount(caps).with_greeting(Greeting::from_indices(1, 0)));

        assert_eq!(
            page.view(),
            View::Home {
                greeting: "hey :D".to_owned(),
                first_visit: false,
            }
        );
    }

    #[test]
    fn test_doc_mount_requests_fetch() {
        let (page, effect) = mount("/docs/quickstart");

        assert_eq!(effect, Effect::Fetch(PageId::new("quickstart")));
        assert!(matches!(page.view(), View::Loading));
    }

    #[test]
    fn test_static_pages_have_no_effect() {
        for (path, kind) in [
            ("/", PageKind::Home),
            ("/index", PageKind::Index),
            ("/changelog", PageKind::Changelog),
        ] {
            let (page, effect) = mount(path);
            assert_eq!(page.kind(), kind);
            assert_eq!(effect, Effect::None);
        }
    }

    #[test]
    fn test_not_found_canonicalizes_path() {
        let (_, effect) = NotFoundPage::mount("/totally/unknown");
        assert_eq!(effect, Effect::Replace("/404".to_owned()));

        let (_, effect) = NotFoundPage::mount("/404");
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_doc_route_without_param_is_not_found() {
        let route = RouteMatch {
            page: PageKind::Doc,
            path: "/docs".to_owned(),
            params: HashMap::new(),
        };
        let (page, effect) = Page::mount(&route, &context());

        assert_eq!(page.kind(), PageKind::NotFound);
        assert_eq!(effect, Effect::Replace("/404".to_owned()));
    }

    #[test]
    fn test_resolve_success_renders() {
        let renderer = MarkdownRenderer::new();
        let (mut page, _) = DocPage::mount(PageId::new("quickstart"));

        let effect = page.resolve(Ok("# Hi\n".to_owned()), &renderer);

        assert_eq!(effect, Effect::None);
        assert_eq!(page.state(), &DocState::Rendered("<h1>Hi</h1>\n".to_owned()));
    }

    #[test]
    fn test_resolve_not_found_redirects() {
        let renderer = MarkdownRenderer::new();
        let (mut page, _) = DocPage::mount(PageId::new("missing"));

        let effect = page.resolve(
            Err(StorageError::new(StorageErrorKind::NotFound)),
            &renderer,
        );

        assert_eq!(effect, Effect::Replace("/404".to_owned()));
        assert_eq!(page.state(), &DocState::RedirectPending);
    }

    #[test]
    fn test_resolve_invalid_path_redirects() {
        let renderer = MarkdownRenderer::new();
        let (mut page, _) = DocPage::mount(PageId::new(".."));

        let effect = page.resolve(
            Err(StorageError::new(StorageErrorKind::InvalidPath)),
            &renderer,
        );

        assert_eq!(effect, Effect::Replace("/404".to_owned()));
    }

    #[test]
    fn test_resolve_other_error_fails() {
        let renderer = MarkdownRenderer::new();
        let (mut page, _) = DocPage::mount(PageId::new("quickstart"));

        let effect = page.resolve(
            Err(StorageError::new(StorageErrorKind::Status(500))),
            &renderer,
        );

        assert_eq!(effect, Effect::None);
        assert!(matches!(page.state(), DocState::Failed(_)));
    }

    #[test]
    fn test_resolve_only_once() {
        let renderer = MarkdownRenderer::new();
        let (mut page, _) = DocPage::mount(PageId::new("quickstart"));

        page.resolve(Ok("# First\n".to_owned()), &renderer);
        let effect = page.resolve(
            Err(StorageError::new(StorageErrorKind::NotFound)),
            &renderer,
        );

        assert_eq!(effect, Effect::None);
        assert_eq!(
            page.state(),
            &DocState::Rendered("<h1>First</h1>\n".to_owned())
        );
    }
}

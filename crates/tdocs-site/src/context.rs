//! Site-wide state shared with pages.
//!
//! [`SiteContext`] holds everything pages may read. Each page receives only
//! the capability struct it declares, built from the context at mount time.

use std::fmt;
use std::sync::Arc;

use tdocs_renderer::MarkdownRenderer;
use tdocs_storage::ContentStore;

use crate::visit::VisitState;

/// Entry of the documentation index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexLink {
    /// Link text.
    pub title: String,
    /// Page id the link points to (`/docs/{page}`).
    pub page: String,
}

impl IndexLink {
    /// Create an index entry.
    #[must_use]
    pub fn new(title: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page: page.into(),
        }
    }
}

/// Summary of a repository commit, shown on the changelog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSummary {
    /// Commit hash.
    pub sha: String,
    /// First line of the commit message.
    pub message: String,
}

impl CommitSummary {
    /// Create a commit summary.
    #[must_use]
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: message.into(),
        }
    }

    /// Abbreviated hash (first seven characters).
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

/// What the home page needs.
#[derive(Clone, Copy, Debug)]
pub struct HomeCaps {
    pub first_visit: bool,
}

/// What the index page needs.
#[derive(Clone, Debug)]
pub struct IndexCaps {
    pub entries: Vec<IndexLink>,
}

/// What a document page needs.
#[derive(Clone)]
pub struct DocCaps {
    pub store: Arc<dyn ContentStore>,
    pub renderer: MarkdownRenderer,
}

/// What the changelog needs.
#[derive(Clone, Debug)]
pub struct ChangelogCaps {
    pub commits: Vec<CommitSummary>,
}

/// Read-only state provided to every page.
#[derive(Clone)]
pub struct SiteContext {
    visit: VisitState,
    store: Arc<dyn ContentStore>,
    renderer: MarkdownRenderer,
    index: Vec<IndexLink>,
    commits: Vec<CommitSummary>,
}

impl fmt::Debug for SiteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteContext")
            .field("visit", &self.visit)
            .field("index", &self.index)
            .field("commits", &self.commits.len())
            .finish_non_exhaustive()
    }
}

impl SiteContext {
    /// Context with the default index and no commits.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, visit: VisitState) -> Self {
        Self {
            visit,
            store,
            renderer: MarkdownRenderer::new(),
            index: vec![
                IndexLink::new("Commands", "commands"),
                IndexLink::new("Quickstart", "quickstart"),
            ],
            commits: Vec::new(),
        }
    }

    /// Replace the index entries.
    #[must_use]
    pub fn with_index(mut self, index: Vec<IndexLink>) -> Self {
        self.index = index;
        self
    }

    /// Provide commits for the changelog.
    #[must_use]
    pub fn with_commits(mut self, commits: Vec<CommitSummary>) -> Self {
        self.commits = commits;
        self
    }

    #[must_use]
    pub fn visit(&self) -> &VisitState {
        &self.visit
    }

    #[must_use]
    pub fn home_caps(&self) -> HomeCaps {
        HomeCaps {
            first_visit: self.visit.first_visit(),
        }
    }

    #[must_use]
    pub fn index_caps(&self) -> IndexCaps {
        IndexCaps {
            entries: self.index.clone(),
        }
    }

    #[must_use]
    pub fn doc_caps(&self) -> DocCaps {
        DocCaps {
            store: Arc::clone(&self.store),
            renderer: self.renderer,
        }
    }

    #[must_use]
    pub fn changelog_caps(&self) -> ChangelogCaps {
        ChangelogCaps {
            commits: self.commits.clone(),
        }
    }
}

//! Route table.
//!
//! Maps URL paths to [`PageKind`]s. Routes are tried in declaration order
//! and the first match wins, so the catch-all must come last.
//!
//! Matching rules:
//! - query string and fragment are ignored
//! - a single trailing slash is optional (`/index/` matches `/index`)
//! - literal segments compare ASCII case-insensitively
//! - `{name}` matches exactly one non-empty segment, percent-decoded
//! - `*` matches every path

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// Canonical path of the not-found page.
pub const NOT_FOUND_PATH: &str = "/404";

/// Page component a route mounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    /// Landing page.
    Home,
    /// Documentation index.
    Index,
    /// Markdown document loaded from the content store.
    Doc,
    /// Changelog.
    Changelog,
    /// Not-found page.
    NotFound,
}

/// Error building a route table.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    /// Pattern does not start with `/` and is not `*`.
    #[error("route pattern must start with '/': {0}")]
    MissingLeadingSlash(String),
    /// Parameter segment without a name (`{}`).
    #[error("route pattern has an unnamed parameter: {0}")]
    UnnamedParam(String),
    /// A catch-all route is followed by other routes.
    #[error("catch-all route must be last, found at position {position} of {total}")]
    CatchAllNotLast {
        /// Index of the catch-all route.
        position: usize,
        /// Number of routes in the table.
        total: usize,
    },
}

#[derive(Debug)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug)]
enum Pattern {
    Segments(Vec<Segment>),
    CatchAll,
}

/// A URL pattern bound to a page.
#[derive(Debug)]
pub struct Route {
    source: String,
    pattern: Pattern,
    page: PageKind,
}

impl Route {
    /// Parse a route pattern (`/`, `/index`, `/docs/{page}`, or `*`).
    pub fn new(pattern: &str, page: PageKind) -> Result<Self, RouteError> {
        let parsed = if pattern == "*" {
            Pattern::CatchAll
        } else {
            let rest = pattern
                .strip_prefix('/')
                .ok_or_else(|| RouteError::MissingLeadingSlash(pattern.to_owned()))?;
            let mut segments = Vec::new();
            for raw in split_segments(rest) {
                let segment = match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some("") => return Err(RouteError::UnnamedParam(pattern.to_owned())),
                    Some(name) => Segment::Param(name.to_owned()),
                    None => Segment::Literal(raw.to_owned()),
                };
                segments.push(segment);
            }
            Pattern::Segments(segments)
        };

        Ok(Self {
            source: pattern.to_owned(),
            pattern: parsed,
            page,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Page this route mounts.
    #[must_use]
    pub fn page(&self) -> PageKind {
        self.page
    }

    fn is_catch_all(&self) -> bool {
        matches!(self.pattern, Pattern::CatchAll)
    }

    fn match_segments(&self, segments: &[&str]) -> Option<HashMap<String, String>> {
        let Pattern::Segments(expected) = &self.pattern else {
            return Some(HashMap::new());
        };
        if expected.len() != segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (pattern, actual) in expected.iter().zip(segments) {
            match pattern {
                Segment::Literal(lit) if lit.eq_ignore_ascii_case(actual) => {}
                Segment::Param(name) if !actual.is_empty() => {
                    let value = percent_decode_str(actual).decode_utf8_lossy().into_owned();
                    params.insert(name.clone(), value);
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

/// Result of resolving a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    /// Page to mount.
    pub page: PageKind,
    /// Resolved path (query and fragment removed).
    pub path: String,
    /// Named parameters extracted from the path.
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    /// Look up a named parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Ordered, immutable list of routes.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table, checking that a catch-all (if any) is the last route.
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        let total = routes.len();
        if let Some(position) = routes.iter().position(Route::is_catch_all)
            && position + 1 != total
        {
            return Err(RouteError::CatchAllNotLast { position, total });
        }
        Ok(Self { routes })
    }

    /// The documentation site's routes.
    #[must_use]
    pub fn site() -> Self {
        let table = [
            ("/", PageKind::Home),
            ("/index", PageKind::Index),
            ("/docs/{page}", PageKind::Doc),
            ("/changelog", PageKind::Changelog),
            (NOT_FOUND_PATH, PageKind::NotFound),
            ("*", PageKind::NotFound),
        ];
        let routes = table
            .into_iter()
            .filter_map(|(pattern, page)| Route::new(pattern, page).ok())
            .collect();
        Self { routes }
    }

    /// Routes in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a path to the first matching route.
    ///
    /// Returns `None` only when the table has no catch-all and nothing matches.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = strip_path(path);
        let trimmed = path.trim_start_matches('/');
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let segments: Vec<&str> = split_segments(trimmed).collect();

        let found = self.routes.iter().find_map(|route| {
            route
                .match_segments(&segments)
                .map(|params| (route.page, params))
        });

        match found {
            Some((page, params)) => {
                tracing::debug!(path = %path, ?page, "Resolved route");
                Some(RouteMatch {
                    page,
                    path: path.to_owned(),
                    params,
                })
            }
            None => {
                tracing::debug!(path = %path, "No route matched");
                None
            }
        }
    }
}

/// Normalize a navigation target into a path with a leading slash.
///
/// Accepts hash-history forms (`#/docs/x`, `/#/docs/x`) as well as plain
/// paths.
#[must_use]
pub fn normalize_path(target: &str) -> String {
    let target = target.trim();
    let target = target
        .strip_prefix("/#")
        .or_else(|| target.strip_prefix('#'))
        .unwrap_or(target);
    if target.starts_with('/') {
        target.to_owned()
    } else {
        format!("/{target}")
    }
}

/// Drop the query string and fragment from a path.
fn strip_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    // "" is the root: zero segments, not one empty segment
    let root = path.is_empty();
    path.split('/').filter(move |_| !root)
}

//! Navigation history.
//!
//! A stack of visited paths with the same push/replace semantics as a
//! browser history: `push` adds an entry, `replace` overwrites the current
//! one without growing the stack.

/// How a navigation changed the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationKind {
    /// A new entry was added.
    Push,
    /// The current entry was overwritten.
    Replace,
    /// The current entry was popped.
    Back,
}

/// One recorded navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Kind of navigation.
    pub kind: NavigationKind,
    /// Path that was current before, if any.
    pub from: Option<String>,
    /// Path that is current after.
    pub to: String,
}

/// Navigation history.
///
/// Keeps the most recent transition and a count of replaces, not a full log.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    last: Option<Transition>,
    replaces: usize,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current path.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Most recent navigation.
    #[must_use]
    pub fn last_transition(&self) -> Option<&Transition> {
        self.last.as_ref()
    }

    /// Number of `replace` navigations performed.
    #[must_use]
    pub fn replace_count(&self) -> usize {
        self.replaces
    }

    /// Add a new entry.
    pub fn push(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.record(NavigationKind::Push, &path);
        self.entries.push(path);
    }

    /// Overwrite the current entry (or add one if the history is empty).
    pub fn replace(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.record(NavigationKind::Replace, &path);
        match self.entries.last_mut() {
            Some(last) => *last = path,
            None => self.entries.push(path),
        }
    }

    /// Pop the current entry. Returns the new current path.
    ///
    /// The first entry is never popped.
    pub fn back(&mut self) -> Option<&str> {
        if self.entries.len() < 2 {
            return None;
        }
        let from = self.entries.pop();
        let to = self.current()?.to_owned();
        self.last = Some(Transition {
            kind: NavigationKind::Back,
            from,
            to,
        });
        self.current()
    }

    fn record(&mut self, kind: NavigationKind, to: &str) {
        if kind == NavigationKind::Replace {
            self.replaces += 1;
        }
        self.last = Some(Transition {
            kind,
            from: self.current().map(str::to_owned),
            to: to.to_owned(),
        });
    }
}

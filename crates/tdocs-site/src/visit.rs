//! Visit state and client-side key/value storage.
//!
//! [`VisitState`] is read once at startup: if the `firstVisit` key is absent
//! this session is a first visit. A single delayed write then records that
//! the visit happened, so the next session greets the visitor back.
//!
//! Storage backends implement [`LocalStorage`]:
//! - [`MemoryStorage`]: in-process map, lost on exit
//! - [`FileStorage`]: JSON object in a file on disk

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Storage key of the first-visit flag.
pub const FIRST_VISIT_KEY: &str = "firstVisit";

/// Value written for the first-visit flag. Only its presence is checked.
pub const FIRST_VISIT_VALUE: &str = "yes";

/// Delay after startup before the flag is written.
pub const DEFAULT_PERSIST_DELAY: Duration = Duration::from_secs(10);

/// Error writing to client storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageWriteError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage that survives between sessions.
pub trait LocalStorage: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageWriteError>;
}

/// In-memory [`LocalStorage`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageWriteError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// [`LocalStorage`] persisted as a JSON object file.
///
/// ```text
/// { "firstVisit": "yes" }
/// ```
///
/// A missing or unreadable file reads as empty storage.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage backed by the file at `path` (created on first write).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "ignoring malformed storage file: {e}");
            BTreeMap::new()
        })
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageWriteError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut values = self.read_all();
        values.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&values)?)?;
        Ok(())
    }
}

/// Whether this session is the visitor's first, plus the means to record it.
#[derive(Clone)]
pub struct VisitState {
    first_visit: bool,
    storage: Arc<dyn LocalStorage>,
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitState")
            .field("first_visit", &self.first_visit)
            .finish_non_exhaustive()
    }
}

impl VisitState {
    /// Read the flag from storage.
    #[must_use]
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let first_visit = storage.get(FIRST_VISIT_KEY).is_none();
        tracing::debug!(first_visit, "Loaded visit state");
        Self {
            first_visit,
            storage,
        }
    }

    /// True when no visit had been recorded at startup.
    ///
    /// Fixed for the lifetime of the session, even after the flag is written.
    #[must_use]
    pub fn first_visit(&self) -> bool {
        self.first_visit
    }

    /// Write the flag now. Writing an already present flag is a no-op.
    pub fn persist_now(&self) -> Result<(), StorageWriteError> {
        if self.storage.get(FIRST_VISIT_KEY).is_some() {
            return Ok(());
        }
        self.storage.set(FIRST_VISIT_KEY, FIRST_VISIT_VALUE)
    }

    /// Spawn a task that writes the flag after `delay`.
    ///
    /// There is no cancellation: if the process exits first the write never
    /// happens and the next session is again a first visit.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn schedule_persist(&self, delay: Duration) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match state.persist_now() {
                Ok(()) => tracing::debug!("Recorded visit"),
                Err(e) => tracing::warn!("Failed to record visit: {e}"),
            }
        })
    }
}

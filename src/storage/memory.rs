//! In-process snapshot store
//!
//! Keeps the encoded snapshot in memory. Useful for embedding the engine
//! without a filesystem and for exercising failure paths.

use std::cell::{Cell, RefCell};

use tracing::warn;

use super::snapshot::{decode, encode};
use crate::domain::{CompletionState, CourseCatalog, PersistenceAdapter, PersistenceError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RefCell<Option<String>>,
    saves: Cell<usize>,
    fail_saves: bool,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose saves always fail
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Creates a store holding a raw snapshot
    pub fn with_snapshot(raw: impl Into<String>) -> Self {
        Self {
            snapshot: RefCell::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// Returns the raw snapshot, if one was saved
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.borrow().clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl PersistenceAdapter for MemoryStore {
    fn load(&self, catalog: &CourseCatalog) -> CompletionState {
        let snapshot = self.snapshot.borrow();
        let raw = match snapshot.as_deref() {
            Some(raw) => raw,
            None => return CompletionState::new(),
        };

        decode(catalog, raw).unwrap_or_else(|e| {
            let reason = format!("{:#}", e);
            warn!(error = %reason, "Ignoring malformed snapshot");
            CompletionState::new()
        })
    }

    fn save(&self, state: &CompletionState) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::Unavailable(
                "memory store configured to fail".to_string(),
            ));
        }

        let content = encode(state).map_err(|e| PersistenceError::Write(format!("{:#}", e)))?;
        *self.snapshot.borrow_mut() = Some(content);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

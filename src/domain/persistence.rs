//! Persistence port for completion state
//!
//! The core only needs two operations: load a snapshot at session start and
//! save one after each completion. Implementations live in `storage`.

use thiserror::Error;

use super::catalog::CourseCatalog;
use super::completion::CompletionState;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to save completion state: {0}")]
    Write(String),
}

/// Loads and saves completion snapshots
pub trait PersistenceAdapter {
    /// Loads the last saved state
    ///
    /// Returns an empty state when there is no snapshot or it cannot be read
    /// as a mapping of known course codes to booleans. Never fails.
    fn load(&self, catalog: &CourseCatalog) -> CompletionState;

    /// Saves the given state, replacing any previous snapshot
    fn save(&self, state: &CompletionState) -> Result<(), PersistenceError>;
}

impl<P: PersistenceAdapter + ?Sized> PersistenceAdapter for &P {
    fn load(&self, catalog: &CourseCatalog) -> CompletionState {
        (**self).load(catalog)
    }

    fn save(&self, state: &CompletionState) -> Result<(), PersistenceError> {
        (**self).save(state)
    }
}

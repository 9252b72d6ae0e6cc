//! JSON snapshot storage for completion state
//!
//! The snapshot is a JSON object mapping course code to a completion flag:
//!
//! ```json
//! {
//!   "HPE101": true,
//!   "TTS101": true
//! }
//! ```
//!
//! Readers and writers serialize on a `<file>.lock` sidecar that is never
//! renamed or removed. Writes go to `<file>.tmp` and are renamed into place.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use tracing::{debug, warn};

use crate::domain::{CompletionState, CourseCatalog, PersistenceAdapter, PersistenceError};

/// Default snapshot file name inside `.curriculum/`
pub const DEFAULT_STATE_FILE: &str = "progress.json";

/// Encodes a state as a code -> `true` mapping
pub fn encode(state: &CompletionState) -> Result<String> {
    let map: BTreeMap<&str, bool> = state.iter().map(|code| (code.as_str(), true)).collect();
    serde_json::to_string_pretty(&map).context("Failed to serialize completion state")
}

/// Decodes a snapshot against a catalog
///
/// Fails if the data is not an object of booleans or names a course the
/// catalog does not contain. Entries set to `false` are not completed.
pub fn decode(catalog: &CourseCatalog, raw: &str) -> Result<CompletionState> {
    let map: BTreeMap<String, bool> =
        serde_json::from_str(raw).context("Snapshot is not a mapping of course codes to booleans")?;

    if let Some(unknown) = map.keys().find(|code| !catalog.contains(code)) {
        anyhow::bail!("Snapshot references unknown course: {}", unknown);
    }

    let completed = map
        .into_iter()
        .filter(|(_, done)| *done)
        .map(|(code, _)| code);

    Ok(CompletionState::from_codes(catalog, completed)?)
}

fn write_error(e: anyhow::Error) -> PersistenceError {
    PersistenceError::Write(format!("{:#}", e))
}

/// Store for completion snapshots in a JSON file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a new snapshot store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the store for a project
    pub fn for_project(project_root: &Path, file_name: &str) -> Self {
        Self::new(project_root.join(".curriculum").join(file_name))
    }

    /// Returns the path to the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path of the lock file guarding the snapshot
    pub fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    /// `<file><suffix>` in the snapshot's directory
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn open_lock(&self) -> Result<File> {
        let lock_path = self.lock_path();
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))
    }

    /// Reads the raw snapshot, or `None` if there is none yet
    pub fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let lock = self.open_lock()?;
        lock.lock_shared()
            .context("Failed to acquire read lock on snapshot")?;

        let mut content = String::new();
        File::open(&self.path)
            .and_then(|mut file| file.read_to_string(&mut content))
            .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))?;

        // Lock is released when `lock` is dropped
        Ok(Some(content))
    }

    /// Replaces the snapshot (temp file + atomic rename)
    pub fn write_raw(&self, content: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let lock = self.open_lock()?;
        lock.lock_exclusive()
            .context("Failed to acquire write lock on snapshot")?;

        let temp_path = self.sibling(".tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);
            writeln!(writer, "{}", content).context("Failed to write snapshot")?;
            writer.flush().context("Failed to flush snapshot")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

impl PersistenceAdapter for SnapshotStore {
    fn load(&self, catalog: &CourseCatalog) -> CompletionState {
        let raw = match self.read_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(path = %self.path.display(), "No snapshot yet, starting empty");
                return CompletionState::new();
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(error = %reason, "Failed to read snapshot, starting empty");
                return CompletionState::new();
            }
        };

        match decode(catalog, &raw) {
            Ok(state) => state,
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(path = %self.path.display(), error = %reason, "Ignoring malformed snapshot");
                CompletionState::new()
            }
        }
    }

    fn save(&self, state: &CompletionState) -> Result<(), PersistenceError> {
        let content = encode(state).map_err(write_error)?;
        self.write_raw(&content).map_err(write_error)?;
        debug!(path = %self.path.display(), completed = state.len(), "Saved snapshot");
        Ok(())
    }
}

//! Project management
//!
//! Handles project initialization and provides access to the catalog and the
//! completion snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

use super::catalog_file::{builtin_catalog, load_catalog};
use super::{Config, SnapshotStore};
use crate::domain::CourseCatalog;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a curriculum project. Run 'curriculum init' first.")]
    NotInProject,
}

const DEFAULT_CONFIG: &str = r#"# Curriculum tracker configuration

# Catalog file, relative to the project root. Leave unset to use the
# built-in catalog.
# catalog = "catalog.toml"

# Completion snapshot, stored inside .curriculum/
state_file = "progress.json"
"#;

/// A curriculum project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".curriculum").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a project at the given path
    ///
    /// Re-running on an existing project keeps its config unless a catalog
    /// is given, in which case the catalog is validated and recorded.
    pub fn init(root: impl Into<PathBuf>, catalog: Option<&Path>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(".curriculum");

        fs::create_dir_all(&project_dir).with_context(|| {
            format!("Failed to create .curriculum directory: {}", project_dir.display())
        })?;

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = project_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, "# Snapshot lock files and leftovers from interrupted writes\n*.lock\n*.tmp\n").with_context(
                || format!("Failed to write .gitignore: {}", gitignore_path.display()),
            )?;
        }

        let mut project = Self::open(root)?;

        if let Some(catalog) = catalog {
            // Refuse to record a catalog the tracker could not start with
            let catalog_path = catalog
                .canonicalize()
                .with_context(|| format!("Catalog file not found: {}", catalog.display()))?;
            load_catalog(&catalog_path)?;

            let project_root = project.root.canonicalize().unwrap_or_else(|_| project.root.clone());
            let stored = match catalog_path.strip_prefix(&project_root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => catalog_path.clone(),
            };

            debug!(catalog = %stored.display(), "Recording catalog in project config");
            project.config.project.catalog = Some(stored);
            project.config.save_project()?;
        }

        Ok(project)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .curriculum directory path
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(".curriculum")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads and validates the project's catalog
    pub fn catalog(&self) -> Result<CourseCatalog> {
        match self.config.catalog_path() {
            Some(path) => {
                debug!(path = %path.display(), "Loading catalog");
                load_catalog(&path)
            }
            None => {
                debug!("Using built-in catalog");
                builtin_catalog()
            }
        }
    }

    /// Returns the completion snapshot store
    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::for_project(&self.root, &self.config.project.state_file)
    }
}

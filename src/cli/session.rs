//! Shared setup for commands that work on the current project

use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::{CompletionStateMachine, CourseCatalog, CourseCode};
use crate::storage::{Project, SnapshotStore};

/// An opened project with its validated catalog
pub struct Session {
    project: Project,
    catalog: CourseCatalog,
}

impl Session {
    /// Opens the project in the current directory and loads its catalog
    pub fn open() -> Result<Self> {
        let project = Project::open_current()?;
        debug!(root = %project.root().display(), "Opened project");

        let catalog = project.catalog()?;
        debug!(courses = catalog.len(), "Catalog loaded");

        Ok(Self { project, catalog })
    }

    pub fn catalog(&self) -> &CourseCatalog {
        &self.catalog
    }

    /// Starts a completion session from the saved snapshot
    pub fn machine(&self) -> CompletionStateMachine<'_, SnapshotStore> {
        CompletionStateMachine::open(&self.catalog, self.project.snapshot_store())
    }
}

/// `CODE - Name`, or just the code if the catalog lacks it
pub fn course_label(catalog: &CourseCatalog, code: &CourseCode) -> String {
    match catalog.get(code.as_str()) {
        Some(course) => format!("{} - {}", course.code, course.name),
        None => code.to_string(),
    }
}

/// `{"code": .., "name": ..}` for JSON output
pub fn course_ref(catalog: &CourseCatalog, code: &CourseCode) -> Value {
    let name = catalog.get(code.as_str()).map(|c| c.name.as_str());
    json!({ "code": code, "name": name })
}

/// Maps a list of codes to JSON course references
pub fn course_refs(catalog: &CourseCatalog, codes: &[CourseCode]) -> Vec<Value> {
    codes.iter().map(|code| course_ref(catalog, code)).collect()
}

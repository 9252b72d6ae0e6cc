//! Eligibility evaluation
//!
//! Classifies each course against a completion state. Classification is
//! derived on demand and never stored, so it always reflects the latest
//! state.

use serde::Serialize;

use super::catalog::CourseCatalog;
use super::completion::CompletionState;
use super::course::{Course, CourseCode, Prerequisites};

/// Status of a course for a given completion state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    Completed,
    Available,
    /// Missing prerequisites, never empty, in definition order
    Blocked { missing: Vec<CourseCode> },
}

impl Classification {
    /// Returns true if the course is completed
    pub fn is_completed(&self) -> bool {
        matches!(self, Classification::Completed)
    }

    /// Returns true if the course can be completed now
    pub fn is_available(&self) -> bool {
        matches!(self, Classification::Available)
    }

    /// Returns true if prerequisites are missing
    pub fn is_blocked(&self) -> bool {
        matches!(self, Classification::Blocked { .. })
    }

    /// Returns the missing prerequisites (empty unless blocked)
    pub fn missing(&self) -> &[CourseCode] {
        match self {
            Classification::Blocked { missing } => missing,
            _ => &[],
        }
    }

    /// Short lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Completed => "completed",
            Classification::Available => "available",
            Classification::Blocked { .. } => "blocked",
        }
    }
}

/// Aggregate counts over the whole catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub available: usize,
    pub blocked: usize,
}

impl Progress {
    /// Completed share of the catalog, rounded down
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.completed * 100 / self.total
        }
    }
}

/// Read-only evaluator over a catalog
#[derive(Debug, Clone, Copy)]
pub struct EligibilityEvaluator<'a> {
    catalog: &'a CourseCatalog,
}

impl<'a> EligibilityEvaluator<'a> {
    pub fn new(catalog: &'a CourseCatalog) -> Self {
        Self { catalog }
    }

    /// Classifies a single course
    pub fn classify(&self, course: &Course, state: &CompletionState) -> Classification {
        if state.contains(course.code.as_str()) {
            return Classification::Completed;
        }

        let missing: Vec<CourseCode> = match &course.prerequisites {
            Prerequisites::Explicit(codes) => codes
                .iter()
                .filter(|code| !state.contains(code.as_str()))
                .cloned()
                .collect(),
            Prerequisites::RequiresAll => self
                .catalog
                .all_codes()
                .filter(|code| *code != &course.code)
                .filter(|code| !state.contains(code.as_str()))
                .cloned()
                .collect(),
        };

        if missing.is_empty() {
            Classification::Available
        } else {
            Classification::Blocked { missing }
        }
    }

    /// Classifies every course, in catalog order
    pub fn classify_all(&self, state: &CompletionState) -> Vec<(&'a Course, Classification)> {
        self.catalog
            .iter()
            .map(|course| (course, self.classify(course, state)))
            .collect()
    }

    /// Counts courses per classification
    pub fn progress(&self, state: &CompletionState) -> Progress {
        let mut progress = Progress {
            total: self.catalog.len(),
            completed: 0,
            available: 0,
            blocked: 0,
        };

        for course in self.catalog.iter() {
            match self.classify(course, state) {
                Classification::Completed => progress.completed += 1,
                Classification::Available => progress.available += 1,
                Classification::Blocked { .. } => progress.blocked += 1,
            }
        }

        progress
    }
}

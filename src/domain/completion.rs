//! Completion state
//!
//! The set of course codes a student has completed. Every code in the set is
//! known to the catalog it was built against. Only the state machine inserts
//! codes; nothing removes them.

use std::collections::BTreeSet;

use super::catalog::{CatalogError, CourseCatalog};
use super::course::CourseCode;

/// Set of completed course codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionState {
    completed: BTreeSet<CourseCode>,
}

impl CompletionState {
    /// Creates an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from codes, rejecting any code absent from the catalog
    pub fn from_codes<I, C>(catalog: &CourseCatalog, codes: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let mut completed = BTreeSet::new();
        for code in codes {
            let course = catalog.lookup(code.as_ref())?;
            completed.insert(course.code.clone());
        }
        Ok(Self { completed })
    }

    /// Returns true if the course is completed
    pub fn contains(&self, code: &str) -> bool {
        self.completed.contains(code)
    }

    /// Returns the number of completed courses
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Returns true if nothing is completed
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Iterates over completed codes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &CourseCode> {
        self.completed.iter()
    }

    /// Returns true if every code in `self` is also in `other`
    pub fn is_subset(&self, other: &CompletionState) -> bool {
        self.completed.is_subset(&other.completed)
    }

    /// Marks a course completed; returns false if it already was
    pub(crate) fn insert(&mut self, code: CourseCode) -> bool {
        self.completed.insert(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::Course;

    fn catalog() -> CourseCatalog {
        CourseCatalog::new(vec![
            Course::new("A".parse().unwrap(), "A", 1),
            Course::new("B".parse().unwrap(), "B", 1),
        ])
        .unwrap()
    }

    #[test]
    fn from_codes_accepts_known() {
        let state = CompletionState::from_codes(&catalog(), ["B", "A"]).unwrap();
        assert_eq!(state.len(), 2);
        assert!(state.contains("A"));

        let order: Vec<&str> = state.iter().map(|c| c.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn from_codes_rejects_unknown() {
        let result = CompletionState::from_codes(&catalog(), ["A", "Q"]);
        assert_eq!(result, Err(CatalogError::NotFound("Q".to_string())));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut state = CompletionState::new();
        assert!(state.insert("A".parse().unwrap()));
        assert!(!state.insert("A".parse().unwrap()));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn subset() {
        let catalog = catalog();
        let small = CompletionState::from_codes(&catalog, ["A"]).unwrap();
        let big = CompletionState::from_codes(&catalog, ["A", "B"]).unwrap();
        assert!(small.is_subset(&big));
        assert!(!big.is_subset(&small));
        assert!(CompletionState::new().is_subset(&small));
    }
}

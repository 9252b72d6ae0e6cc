//! Completion state machine
//!
//! Sole writer of [`CompletionState`]. Each course moves Blocked -> Available
//! implicitly as prerequisites are completed, and Available -> Completed
//! through [`CompletionStateMachine::attempt_complete`]. Completed is
//! absorbing: there is no operation that removes a code from the state.

use tracing::{debug, warn};

use super::catalog::{CatalogError, CourseCatalog};
use super::completion::CompletionState;
use super::course::{Course, CourseCode};
use super::eligibility::{Classification, EligibilityEvaluator, Progress};
use super::persistence::{PersistenceAdapter, PersistenceError};

/// Result of an attempt to complete a course
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The course was already completed; nothing was written
    AlreadyCompleted,

    /// The course is now completed
    Completed {
        /// Courses that moved from blocked to available, dependents first,
        /// capstone last
        unlocked: Vec<CourseCode>,

        /// Set when the snapshot could not be saved; the in-memory
        /// completion stands regardless
        save_error: Option<PersistenceError>,
    },

    /// Prerequisites are missing; the state is unchanged
    Rejected { missing: Vec<CourseCode> },
}

impl AttemptOutcome {
    /// Returns true unless the attempt was rejected
    pub fn is_success(&self) -> bool {
        !matches!(self, AttemptOutcome::Rejected { .. })
    }

    /// Returns the missing prerequisites of a rejected attempt
    pub fn missing(&self) -> &[CourseCode] {
        match self {
            AttemptOutcome::Rejected { missing } => missing,
            _ => &[],
        }
    }
}

/// Owns the completion state of one session
pub struct CompletionStateMachine<'a, P> {
    catalog: &'a CourseCatalog,
    evaluator: EligibilityEvaluator<'a>,
    state: CompletionState,
    store: P,
}

impl<'a, P: PersistenceAdapter> CompletionStateMachine<'a, P> {
    /// Starts a session from the store's last snapshot
    pub fn open(catalog: &'a CourseCatalog, store: P) -> Self {
        let state = store.load(catalog);
        debug!(completed = state.len(), "Loaded completion state");
        Self::with_state(catalog, state, store)
    }

    /// Starts a session from an explicit state
    pub fn with_state(catalog: &'a CourseCatalog, state: CompletionState, store: P) -> Self {
        Self {
            catalog,
            evaluator: EligibilityEvaluator::new(catalog),
            state,
            store,
        }
    }

    /// Attempts to mark a course completed
    ///
    /// Unknown codes are an error. Blocked courses are rejected with their
    /// missing prerequisites. Completing an already completed course is a
    /// no-op that does not touch the store.
    pub fn attempt_complete(&mut self, code: &str) -> Result<AttemptOutcome, CatalogError> {
        let course = self.catalog.lookup(code)?;
        let classification = self.evaluator.classify(course, &self.state);

        match classification {
            Classification::Completed => {
                debug!(course = %course.code, "Course already completed");
                Ok(AttemptOutcome::AlreadyCompleted)
            }
            Classification::Blocked { missing } => {
                debug!(course = %course.code, missing = missing.len(), "Completion rejected");
                Ok(AttemptOutcome::Rejected { missing })
            }
            Classification::Available => {
                self.state.insert(course.code.clone());
                debug!(course = %course.code, "Course completed");

                let save_error = match self.store.save(&self.state) {
                    Ok(()) => None,
                    Err(e) => {
                        warn!(course = %course.code, error = %e, "Completion kept in memory only");
                        Some(e)
                    }
                };

                Ok(AttemptOutcome::Completed {
                    unlocked: self.unlocked_by(course),
                    save_error,
                })
            }
        }
    }

    /// Courses that became available because `course` was just completed
    ///
    /// Only courses whose required set contains `course` can change, and all
    /// of those that are not completed were blocked before.
    fn unlocked_by(&self, course: &Course) -> Vec<CourseCode> {
        self.catalog
            .unlocks(course.code.as_str())
            .into_iter()
            .filter(|c| self.evaluator.classify(c, &self.state).is_available())
            .map(|c| c.code.clone())
            .collect()
    }

    /// Classifies a course against the current state
    pub fn classify(&self, code: &str) -> Result<Classification, CatalogError> {
        let course = self.catalog.lookup(code)?;
        Ok(self.evaluator.classify(course, &self.state))
    }

    /// Classifies every course against the current state
    pub fn classify_all(&self) -> Vec<(&'a Course, Classification)> {
        self.evaluator.classify_all(&self.state)
    }

    /// Counts over the current state
    pub fn progress(&self) -> Progress {
        self.evaluator.progress(&self.state)
    }

    /// Returns the current state
    pub fn state(&self) -> &CompletionState {
        &self.state
    }
}

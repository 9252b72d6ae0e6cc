//! Domain models for the curriculum tracker
//!
//! Contains the core business logic without any I/O concerns.

mod catalog;
mod completion;
mod course;
mod eligibility;
mod machine;
mod persistence;

pub use catalog::{CatalogError, CourseCatalog, SemesterGroup};
pub use completion::CompletionState;
pub use course::{CodeError, Course, CourseCode, Prerequisites, REQUIRES_ALL_KEYWORD};
pub use eligibility::{Classification, EligibilityEvaluator, Progress};
pub use machine::{AttemptOutcome, CompletionStateMachine};
pub use persistence::{PersistenceAdapter, PersistenceError};

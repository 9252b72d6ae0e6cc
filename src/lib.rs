//! Curriculum CLI - A local-first tracker for progress through a curriculum
//!
//! A curriculum is a catalog of courses linked by prerequisites. The engine
//! classifies every course as completed, available, or blocked (and by
//! what), and only lets a course be completed once its prerequisites are.
//! One course may require every other course (the capstone).

pub mod cli;
pub mod domain;
pub mod logging;
pub mod storage;

pub use domain::{
    AttemptOutcome, Classification, CompletionState, CompletionStateMachine, Course,
    CourseCatalog, CourseCode, EligibilityEvaluator, PersistenceAdapter, Prerequisites,
};

//! Course commands (complete, show)

use anyhow::Result;
use serde_json::json;
use tracing::debug;

use super::output::Output;
use super::session::{course_label, course_refs, Session};
use crate::domain::{AttemptOutcome, Classification, Prerequisites};

/// Marks a course completed, or explains what blocks it
pub fn complete(output: &Output, code: &str) -> Result<()> {
    let session = Session::open()?;
    let catalog = session.catalog();
    let mut machine = session.machine();

    let course = catalog.lookup(code)?;
    let outcome = machine.attempt_complete(code)?;
    debug!(course = %course.code, success = outcome.is_success(), "Completion attempt finished");

    match outcome {
        AttemptOutcome::AlreadyCompleted => {
            if output.is_json() {
                output.data(&json!({
                    "code": course.code,
                    "status": "already_completed",
                }));
            } else {
                println!("{} is already completed.", course_label(catalog, &course.code));
            }
        }

        AttemptOutcome::Completed {
            unlocked,
            save_error,
        } => {
            if let Some(e) = &save_error {
                output.error(&format!("Progress could not be saved: {:#}", e));
            }

            if output.is_json() {
                output.data(&json!({
                    "code": course.code,
                    "status": "completed",
                    "saved": save_error.is_none(),
                    "unlocked": course_refs(catalog, &unlocked),
                }));
            } else {
                println!("Completed {}", course_label(catalog, &course.code));
                if !unlocked.is_empty() {
                    println!();
                    println!("Now available:");
                    for code in &unlocked {
                        println!("  {}", course_label(catalog, code));
                    }
                }
            }
        }

        AttemptOutcome::Rejected { missing } => {
            if output.is_json() {
                output.data(&json!({
                    "code": course.code,
                    "status": "blocked",
                    "missing": course_refs(catalog, &missing),
                }));
            } else {
                println!("Course blocked: {}", course.name);
                println!("Complete these courses first:");
                for code in &missing {
                    println!("  - {}", course_label(catalog, code));
                }
            }

            anyhow::bail!(
                "{} is blocked by {} missing prerequisite(s)",
                course.code,
                missing.len()
            );
        }
    }

    Ok(())
}

/// Shows a course with its prerequisites and current status
pub fn show(output: &Output, code: &str) -> Result<()> {
    let session = Session::open()?;
    let catalog = session.catalog();
    let machine = session.machine();

    let course = catalog.lookup(code)?;
    let classification = machine.classify(code)?;
    let unlocks: Vec<_> = catalog.unlocks(code).into_iter().map(|c| c.code.clone()).collect();

    if output.is_json() {
        let requires = match &course.prerequisites {
            Prerequisites::RequiresAll => json!("all"),
            Prerequisites::Explicit(codes) => json!(course_refs(catalog, codes)),
        };

        output.data(&json!({
            "code": course.code,
            "name": course.name,
            "semester": course.semester,
            "requires": requires,
            "classification": classification,
            "unlocks": course_refs(catalog, &unlocks),
        }));
        return Ok(());
    }

    println!("{}", course_label(catalog, &course.code));
    println!("{}", "=".repeat(40));
    println!("Semester: {}", course.semester);

    match &course.prerequisites {
        Prerequisites::RequiresAll => {
            println!("Requires: every other course ({})", catalog.all_codes().count());
        }
        Prerequisites::Explicit(codes) if codes.is_empty() => println!("Requires: nothing"),
        Prerequisites::Explicit(codes) => {
            println!("Requires:");
            for code in codes {
                let mark = if machine.state().contains(code.as_str()) { "x" } else { " " };
                println!("  [{}] {}", mark, course_label(catalog, code));
            }
        }
    }

    match &classification {
        Classification::Completed => println!("Status: completed"),
        Classification::Available => println!("Status: available"),
        Classification::Blocked { missing } => {
            println!("Status: blocked ({} missing)", missing.len())
        }
    }

    if !unlocks.is_empty() {
        println!();
        println!("Unlocks:");
        for code in &unlocks {
            println!("  {}", course_label(catalog, code));
        }
    }

    Ok(())
}

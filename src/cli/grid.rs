//! Curriculum grid
//!
//! Renders every semester with the status of each course. The grid is
//! re-derived from the evaluator on every call; nothing is cached.

use anyhow::Result;
use serde_json::json;

use super::output::Output;
use super::session::Session;
use crate::domain::{Classification, CompletionState, CourseCatalog, CourseCode, EligibilityEvaluator};

/// Blocked courses list at most this many missing codes inline
const MAX_INLINE_MISSING: usize = 3;

/// Checkbox-style marker for a classification
pub fn marker(classification: &Classification) -> &'static str {
    match classification {
        Classification::Completed => "[x]",
        Classification::Available => "[ ]",
        Classification::Blocked { .. } => "[-]",
    }
}

fn missing_summary(missing: &[CourseCode]) -> String {
    if missing.len() > MAX_INLINE_MISSING {
        format!("needs {} courses", missing.len())
    } else {
        let codes: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
        format!("needs {}", codes.join(", "))
    }
}

/// Renders the grid as text lines
pub fn render_text(catalog: &CourseCatalog, state: &CompletionState) -> Vec<String> {
    let evaluator = EligibilityEvaluator::new(catalog);
    let mut lines = Vec::new();

    for group in catalog.courses_by_semester() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("Semester {}", group.semester));
        lines.push("-".repeat(40));

        for course in group.courses {
            let cls = evaluator.classify(course, state);
            let mut line = format!("{} {:<8} {}", marker(&cls), course.code, course.name);
            if let Classification::Blocked { missing } = &cls {
                line.push_str(&format!("  ({})", missing_summary(missing)));
            }
            lines.push(line);
        }
    }

    lines
}

/// Show the curriculum grid
pub fn grid(output: &Output) -> Result<()> {
    let session = Session::open()?;
    let catalog = session.catalog();
    let machine = session.machine();
    let evaluator = EligibilityEvaluator::new(catalog);

    if output.is_json() {
        let semesters: Vec<_> = catalog
            .courses_by_semester()
            .into_iter()
            .map(|group| {
                let courses: Vec<_> = group
                    .courses
                    .iter()
                    .map(|course| {
                        json!({
                            "code": course.code,
                            "name": course.name,
                            "classification": evaluator.classify(course, machine.state()),
                        })
                    })
                    .collect();
                json!({ "semester": group.semester, "courses": courses })
            })
            .collect();
        output.data(&semesters);
        return Ok(());
    }

    for line in render_text(catalog, machine.state()) {
        println!("{}", line);
    }

    let progress = machine.progress();
    println!();
    println!(
        "{} of {} completed ({}%)",
        progress.completed,
        progress.total,
        progress.percent()
    );

    Ok(())
}

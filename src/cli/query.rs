//! Query commands (available, blocked, status)
//!
//! Every query classifies the whole catalog against the saved snapshot.

use anyhow::Result;
use serde_json::json;
use tracing::debug;

use super::output::Output;
use super::session::{course_label, course_ref, course_refs, Session};
use crate::domain::Classification;

/// Show courses that can be completed now
pub fn available(output: &Output) -> Result<()> {
    let session = Session::open()?;
    let machine = session.machine();

    let available: Vec<_> = machine
        .classify_all()
        .into_iter()
        .filter(|(_, cls)| cls.is_available())
        .map(|(course, _)| course)
        .collect();

    debug!(count = available.len(), "Found available courses");

    if output.is_json() {
        let items: Vec<_> = available
            .iter()
            .map(|c| {
                json!({
                    "code": c.code,
                    "name": c.name,
                    "semester": c.semester,
                })
            })
            .collect();
        output.data(&items);
    } else if available.is_empty() {
        println!("No courses available.");
    } else {
        println!("Available courses ({}):", available.len());
        println!("{:<10} {:<4} NAME", "CODE", "SEM");
        println!("{}", "-".repeat(60));
        for course in available {
            println!("{:<10} {:<4} {}", course.code, course.semester, course.name);
        }
    }

    Ok(())
}

/// Show blocked courses and what blocks them
pub fn blocked(output: &Output) -> Result<()> {
    let session = Session::open()?;
    let catalog = session.catalog();
    let machine = session.machine();

    let blocked: Vec<_> = machine
        .classify_all()
        .into_iter()
        .filter_map(|(course, cls)| match cls {
            Classification::Blocked { missing } => Some((course, missing)),
            _ => None,
        })
        .collect();

    debug!(count = blocked.len(), "Found blocked courses");

    if output.is_json() {
        let items: Vec<_> = blocked
            .iter()
            .map(|(course, missing)| {
                json!({
                    "code": course.code,
                    "name": course.name,
                    "blocked_by": course_refs(catalog, missing),
                })
            })
            .collect();
        output.data(&items);
    } else if blocked.is_empty() {
        println!("No blocked courses.");
    } else {
        println!("Blocked courses ({}):", blocked.len());
        println!("{:<10} {:<40} BLOCKED BY", "CODE", "NAME");
        println!("{}", "-".repeat(80));
        for (course, missing) in blocked {
            let by: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
            println!("{:<10} {:<40} {}", course.code, course.name, by.join(", "));
        }
    }

    Ok(())
}

/// Show progress overview
pub fn status(output: &Output) -> Result<()> {
    let session = Session::open()?;
    let catalog = session.catalog();
    let machine = session.machine();

    let progress = machine.progress();
    let capstone = match catalog.capstone() {
        Some(course) => Some((course, machine.classify(course.code.as_str())?)),
        None => None,
    };

    if output.is_json() {
        let capstone_json = capstone.as_ref().map(|(course, cls)| {
            json!({
                "course": course_ref(catalog, &course.code),
                "status": cls.label(),
                "remaining": cls.missing().len(),
            })
        });

        output.data(&json!({
            "courses": progress,
            "percent": progress.percent(),
            "completed": machine.state().iter().collect::<Vec<_>>(),
            "capstone": capstone_json,
        }));
        return Ok(());
    }

    println!("Curriculum Status");
    println!("{}", "=".repeat(40));
    println!();
    println!("Courses: {} total", progress.total);
    println!("  [x] Completed:  {}", progress.completed);
    println!("  [ ] Available:  {}", progress.available);
    println!("  [-] Blocked:    {}", progress.blocked);
    println!();
    println!("Progress: {}%", progress.percent());

    if let Some((course, cls)) = capstone {
        println!();
        let label = course_label(catalog, &course.code);
        match cls {
            Classification::Completed => println!("Capstone {}: completed", label),
            Classification::Available => println!("Capstone {}: available", label),
            Classification::Blocked { missing } => println!(
                "Capstone {}: blocked ({} courses remaining)",
                label,
                missing.len()
            ),
        }
    }

    Ok(())
}

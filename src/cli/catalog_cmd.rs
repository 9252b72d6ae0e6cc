//! Catalog validation command

use std::path::Path;

use anyhow::Result;
use serde_json::json;
use tracing::debug;

use super::output::Output;
use crate::domain::CourseCatalog;
use crate::storage::{builtin_catalog, load_catalog, Project};

/// Validates a catalog file, the project's catalog, or the built-in one
pub fn validate(output: &Output, file: Option<&Path>) -> Result<()> {
    let (source, catalog) = match file {
        Some(path) => (path.display().to_string(), load_catalog(path)?),
        None => match Project::open_current() {
            Ok(project) => {
                let source = project
                    .config()
                    .catalog_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in".to_string());
                (source, project.catalog()?)
            }
            Err(_) => {
                debug!("Not in a project, validating the built-in catalog");
                ("built-in".to_string(), builtin_catalog()?)
            }
        },
    };

    report(output, &source, &catalog);
    Ok(())
}

fn report(output: &Output, source: &str, catalog: &CourseCatalog) {
    let semesters = catalog.courses_by_semester().len();
    let capstone = catalog.capstone().map(|c| c.code.clone());
    let order = catalog.topological_order();

    if output.is_json() {
        output.data(&json!({
            "valid": true,
            "source": source,
            "courses": catalog.len(),
            "semesters": semesters,
            "capstone": capstone,
            "order": order,
        }));
        return;
    }

    output.success(&format!(
        "Catalog {} is valid: {} courses across {} semesters",
        source,
        catalog.len(),
        semesters
    ));
    if let Some(code) = capstone {
        println!("Capstone: {}", code);
    }

    let order: Vec<&str> = order.iter().map(|c| c.as_str()).collect();
    println!("Order: {}", order.join(" -> "));
}

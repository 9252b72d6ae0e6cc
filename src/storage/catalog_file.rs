//! Catalog files
//!
//! Catalogs are TOML documents with one `[[course]]` table per course. A
//! default catalog is compiled into the binary and used when the project
//! config does not name a file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::config::ConfigError;
use crate::domain::{Course, CourseCatalog};

/// Catalog shipped with the binary
pub const BUILTIN_CATALOG: &str = include_str!("default_catalog.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "course", default)]
    courses: Vec<Course>,
}

/// Parses and validates a catalog document
pub fn parse_catalog(content: &str) -> Result<CourseCatalog> {
    let file: CatalogFile = toml::from_str(content)
        .map_err(|e| ConfigError::Parse(e.to_string()))
        .context("Failed to parse catalog")?;

    CourseCatalog::new(file.courses).context("Invalid catalog")
}

/// Loads and validates a catalog file
pub fn load_catalog(path: &Path) -> Result<CourseCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;

    parse_catalog(&content).with_context(|| format!("In catalog file {}", path.display()))
}

/// Returns the built-in catalog
pub fn builtin_catalog() -> Result<CourseCatalog> {
    parse_catalog(BUILTIN_CATALOG).context("Built-in catalog is invalid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogError;
    use tempfile::TempDir;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = builtin_catalog().unwrap();

        assert_eq!(catalog.len(), 25);
        assert_eq!(catalog.courses_by_semester().len(), 5);
        assert_eq!(catalog.capstone().unwrap().code.as_str(), "LAB001");
        assert_eq!(catalog.all_codes().count(), 24);
        assert_eq!(
            catalog.lookup("ING401").unwrap().prerequisites.explicit_codes()[0].as_str(),
            "ING301"
        );
    }

    #[test]
    fn parse_minimal_catalog() {
        let catalog = parse_catalog(
            r#"
[[course]]
code = "A"
name = "Alpha"
semester = 1

[[course]]
code = "B"
name = "Beta"
semester = 2
requires = ["A"]
"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.dependents("A")[0].name, "Beta");
    }

    #[test]
    fn legacy_all_sentinel() {
        let catalog = parse_catalog(
            r#"
[[course]]
code = "A"
name = "Alpha"
semester = 1

[[course]]
code = "Z"
name = "Final"
semester = 2
requires = ["ALL"]
"#,
        )
        .unwrap();

        assert!(catalog.lookup("Z").unwrap().is_capstone());
    }

    #[test]
    fn validation_error_is_preserved() {
        let err = parse_catalog(
            r#"
[[course]]
code = "A"
name = "Alpha"
semester = 1
requires = ["B"]

[[course]]
code = "B"
name = "Beta"
semester = 1
requires = ["A"]
"#,
        )
        .unwrap_err();

        let catalog_err = err.downcast_ref::<CatalogError>().unwrap();
        assert!(matches!(catalog_err, CatalogError::CycleDetected(_)));
    }

    #[test]
    fn syntax_error_reported() {
        let err = parse_catalog("[[course]\ncode = ").unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn missing_name_rejected() {
        assert!(parse_catalog("[[course]]\ncode = \"A\"\nsemester = 1\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.toml");

        let builtin = builtin_catalog().unwrap();
        fs::write(&path, BUILTIN_CATALOG).unwrap();

        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded.courses(), builtin.courses());
    }

    #[test]
    fn missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load_catalog(&dir.path().join("nope.toml")).is_err());
    }
}

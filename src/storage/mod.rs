//! # Storage Layer
//!
//! Persistence and configuration for the curriculum tracker.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Catalog | TOML, one `[[course]]` per course | configured path, or built in |
//! | Completion state | JSON object, code -> bool | `.curriculum/progress.json` |
//! | Config | TOML | `.curriculum/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`SnapshotStore`] takes `fs2` file locks around reads and writes
//! - All snapshot writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a curriculum project
//! - [`SnapshotStore`] - File-backed [`PersistenceAdapter`](crate::domain::PersistenceAdapter)
//! - [`MemoryStore`] - In-process adapter
//! - [`Config`] - Project and global configuration

mod catalog_file;
mod config;
mod memory;
mod project;
mod snapshot;

pub use catalog_file::{builtin_catalog, load_catalog, parse_catalog, BUILTIN_CATALOG};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig};
pub use memory::MemoryStore;
pub use project::{Project, ProjectError};
pub use snapshot::{SnapshotStore, DEFAULT_STATE_FILE};

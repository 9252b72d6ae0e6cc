//! # Command-Line Interface
//!
//! The terminal presenter: renders classifications and forwards completion
//! attempts to the state machine.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init`, `validate` |
//! | Progress | Change state | `complete TTS101` |
//! | Query | Read state | `grid`, `available`, `blocked`, `status`, `show TTS201` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logs on stderr:
//! ```bash
//! curriculum --verbose complete TTS101
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod catalog_cmd;
mod course;
mod grid;
mod output;
mod query;
mod session;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};

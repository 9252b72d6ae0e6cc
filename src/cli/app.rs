//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use super::output::{Output, OutputFormat};
use super::{catalog_cmd, course, grid, query};
use crate::logging::init_logging;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "curriculum")]
#[command(author, version, about = "Track progress through a curriculum of prerequisite-linked courses")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true, env = "CURRICULUM_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new curriculum project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Catalog file to use instead of the built-in catalog
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show every semester with the status of each course
    Grid,

    /// Mark a course as completed
    Complete {
        /// Course code
        code: String,
    },

    /// Show courses that can be completed now
    Available,

    /// Show blocked courses and their missing prerequisites
    Blocked,

    /// Show progress overview
    Status,

    /// Show course details
    Show {
        /// Course code
        code: String,
    },

    /// Validate a catalog file
    Validate {
        /// Catalog file (defaults to the project's catalog)
        file: Option<PathBuf>,
    },
}

/// Output format from the flag, else the global config
fn resolve_format(flag: Option<OutputFormat>) -> OutputFormat {
    if let Some(format) = flag {
        return format;
    }

    match Config::load_global() {
        Ok(global) => global.default_format,
        Err(e) => {
            let reason = format!("{:#}", e);
            warn!(error = %reason, "Ignoring unreadable global config");
            OutputFormat::default()
        }
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output::new(resolve_format(cli.format));
    debug!("Curriculum CLI starting");

    match cli.command {
        Commands::Init { path, catalog } => {
            debug!(path = %path, "Initializing project");
            let project = Project::init(&path, catalog.as_deref())?;
            output.success(&format!(
                "Initialized curriculum project at {}",
                project.root().display()
            ));
        }

        Commands::Grid => grid::grid(&output)?,
        Commands::Complete { code } => course::complete(&output, code.trim())?,
        Commands::Available => query::available(&output)?,
        Commands::Blocked => query::blocked(&output)?,
        Commands::Status => query::status(&output)?,
        Commands::Show { code } => course::show(&output, code.trim())?,
        Commands::Validate { file } => catalog_cmd::validate(&output, file.as_deref())?,
    }

    debug!("Command completed successfully");
    Ok(())
}

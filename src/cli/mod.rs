//! Command-line interface for project-scan
//!
//! The scan root is always the current working directory; the only
//! positional argument is an optional filename filter.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scan;

pub use scan::execute;

/// Snapshot the text files of the current directory into a file listing and
/// a path-to-content JSON map under ./project_scan/
#[derive(Parser, Debug)]
#[command(name = "project-scan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Regular expression matched against file base names (e.g. '\.rs$')
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Additional names to exclude wherever they appear (comma-separated or repeated)
    #[arg(short = 'e', long, value_name = "NAMES", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Path to config file (project-scan.toml or .project-scan.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Decode non-UTF-8 files with encoding detection instead of skipping them
    #[arg(long)]
    pub lossy: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // The log level comes from --verbose alone; no environment variable is read.
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::default().add_directive(level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let root = std::env::current_dir().context("Failed to determine the current directory")?;
    execute(&root, &cli)
}

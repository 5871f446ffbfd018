//! Scan command implementation

use anyhow::{Context, Result};
use std::path::Path;

use super::Cli;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{FilterPattern, FILE_CONTENTS_NAME};
use crate::render::write_outputs;
use crate::scan::Scanner;

/// Scan `root` and write the snapshot, printing progress to stdout.
pub fn execute(root: &Path, cli: &Cli) -> Result<()> {
    let filter = cli.pattern.as_deref().map(FilterPattern::new).transpose()?;

    let config = load_config(root, cli.config.as_deref())?;
    let overrides = CliOverrides { exclude: cli.exclude.clone(), lossy: cli.lossy };
    let settings = merge_cli_with_config(&config, &overrides);
    tracing::debug!(
        "Excluding names: {}",
        settings.excludes.names().collect::<Vec<_>>().join(", ")
    );

    println!("Scanning project in: {}", root.display());
    match &filter {
        Some(pattern) => println!("Using filter pattern: {}", pattern),
        None => println!("Scanning all files (no filter specified)"),
    }

    let report = Scanner::new(root.to_path_buf())
        .filter(filter)
        .excludes(settings.excludes)
        .decode(settings.decode)
        .scan()
        .context("Error scanning project")?;

    println!("Found {} files", report.files.len());
    if !report.failures.is_empty() {
        println!("Skipped {} unreadable entries", report.failures.len());
    }

    let paths = write_outputs(root, &report.files).context("Error writing scan output")?;
    println!("File list saved to: {}", paths.file_list.display());
    println!("File contents saved to: {}", paths.file_contents.display());

    println!();
    println!(
        "You can now share {} to get a review of your project's files.",
        FILE_CONTENTS_NAME
    );

    Ok(())
}

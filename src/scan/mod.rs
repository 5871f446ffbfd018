//! Directory scanning with name-based exclusion and base-name filtering

use crate::domain::{ExcludeSet, FilterPattern, ScanReport};
use crate::error::ScanError;
use std::path::Path;

pub mod scanner;

pub use scanner::Scanner;

/// Scan `root` with strict UTF-8 decoding.
pub fn scan<P: AsRef<Path>>(
    root: P,
    filter: Option<&FilterPattern>,
    excludes: &ExcludeSet,
) -> Result<ScanReport, ScanError> {
    Scanner::new(root.as_ref().to_path_buf())
        .filter(filter.cloned())
        .excludes(excludes.clone())
        .scan()
}

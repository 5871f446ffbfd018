//! Output rendering (file listing, contents JSON) and persistence

use crate::domain::{ScanResult, FILE_CONTENTS_NAME, FILE_LIST_NAME, OUTPUT_DIR_NAME};
use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};

pub mod contents;
pub mod listing;

pub use contents::render_contents;
pub use listing::render_listing;

/// Locations of the two files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub output_dir: PathBuf,
    pub file_list: PathBuf,
    pub file_contents: PathBuf,
}

impl OutputPaths {
    pub fn for_root(root: &Path) -> Self {
        let output_dir = root.join(OUTPUT_DIR_NAME);
        Self {
            file_list: output_dir.join(FILE_LIST_NAME),
            file_contents: output_dir.join(FILE_CONTENTS_NAME),
            output_dir,
        }
    }
}

/// Write the listing and the contents JSON under `<root>/project_scan/`.
///
/// The JSON document is fully serialized before anything touches the disk,
/// so a serialization failure never leaves a truncated file behind.
pub fn write_outputs(root: &Path, result: &ScanResult) -> Result<OutputPaths, ScanError> {
    let paths = OutputPaths::for_root(root);

    fs::create_dir_all(&paths.output_dir).map_err(|source| ScanError::OutputDirectory {
        path: paths.output_dir.clone(),
        source,
    })?;

    write_file(&paths.file_list, &render_listing(result))?;

    let json = render_contents(result)?;
    write_file(&paths.file_contents, &json)?;

    tracing::debug!("Wrote {} entries to {}", result.len(), paths.output_dir.display());
    Ok(paths)
}

fn write_file(path: &Path, content: &str) -> Result<(), ScanError> {
    fs::write(path, content)
        .map_err(|source| ScanError::OutputWrite { path: path.to_path_buf(), source })
}

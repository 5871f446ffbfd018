//! Error types for scanning and output writing.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while scanning a tree or persisting its snapshot.
///
/// Per-entry failures inside the tree are not errors at this level; they are
/// collected as [`crate::domain::ScanFailure`] values in the scan report.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scan root could not be opened or listed.
    #[error("Failed to read scan root {}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filter pattern is not a valid regular expression.
    #[error("Invalid filter pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The output directory could not be created.
    #[error("Failed to create output directory {}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One of the output files could not be written.
    #[error("Failed to write {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan result could not be serialized to JSON.
    #[error("Failed to serialize file contents")]
    Serialize(#[from] serde_json::Error),
}

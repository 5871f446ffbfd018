//! project-scan: snapshot a project's text files for external review
//!
//! Walks a directory tree depth-first, prunes noise directories by name,
//! optionally filters files by base name, and writes two artifacts under
//! `<root>/project_scan/`: a flat file listing and a JSON object mapping each
//! relative path to the file's text.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod render;
pub mod scan;
pub mod utils;

pub use domain::{ExcludeSet, FilterPattern, ScanReport, ScanResult};
pub use error::ScanError;
pub use render::write_outputs;
pub use scan::scan;

//! project-scan: snapshot a project's text files into a listing and a JSON map

use anyhow::Result;

fn main() -> Result<()> {
    project_scan::cli::run()
}

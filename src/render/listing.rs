//! Flat file listing

use crate::domain::ScanResult;

/// Join every relative path with `\n`, in mapping order.
///
/// No trailing newline is added, so an empty result renders as an empty
/// string and N files render as exactly N lines.
pub fn render_listing(result: &ScanResult) -> String {
    result.keys().collect::<Vec<_>>().join("\n")
}

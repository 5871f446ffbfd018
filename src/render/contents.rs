//! Path-to-content JSON rendering

use crate::domain::ScanResult;
use crate::error::ScanError;

/// Serialize the whole mapping as a pretty-printed JSON object (two-space
/// indentation, keys in mapping order).
pub fn render_contents(result: &ScanResult) -> Result<String, ScanError> {
    Ok(serde_json::to_string_pretty(result)?)
}

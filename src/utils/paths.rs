//! Relative path keys

use std::path::Path;

/// Express `path` relative to `root` as a string key.
///
/// The platform's native separator is kept. Returns `None` when `path` is not
/// under `root` or is not valid UTF-8.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root).ok()?.to_str().map(str::to_string)
}

//! Shared helpers for reading files and building path keys.

pub mod encoding;
pub mod paths;

pub use encoding::read_text;
pub use paths::relative_key;

//! Merging CLI flags over the loaded config

use crate::domain::{Config, DecodeMode, ExcludeSet};

/// Values given on the command line that take precedence over the config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Extra exclude names, added to whatever the config resolves to.
    pub exclude: Vec<String>,
    /// Force lossy decoding.
    pub lossy: bool,
}

/// Fully resolved scan settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub excludes: ExcludeSet,
    pub decode: DecodeMode,
}

/// Precedence is CLI > config file > defaults.
pub fn merge_cli_with_config(config: &Config, overrides: &CliOverrides) -> ScanSettings {
    let mut excludes = config.exclude_set();
    excludes.extend(overrides.exclude.iter().cloned());

    let decode = if overrides.lossy { DecodeMode::Lossy } else { config.decode };

    ScanSettings { excludes, decode }
}

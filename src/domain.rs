//! Core data types shared by the scanner, the writers and the CLI.

use crate::error::ScanError;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;

/// Name of the directory (under the scan root) that receives the snapshot.
pub const OUTPUT_DIR_NAME: &str = "project_scan";

/// Newline-separated listing of every scanned relative path.
pub const FILE_LIST_NAME: &str = "file_list.txt";

/// Pretty-printed JSON object mapping relative path to content.
pub const FILE_CONTENTS_NAME: &str = "file_contents.json";

/// Names skipped wherever they appear in the tree.
///
/// The output directory is part of the list so a second run never picks up
/// the snapshot written by the first one.
pub fn default_exclude_names() -> &'static [&'static str] {
    &[".git", "node_modules", "dist", "build", OUTPUT_DIR_NAME]
}

/// Ordered mapping of relative path to file content.
///
/// Iteration order is insertion order, which for a scan is traversal order.
/// Serializes as a JSON object with keys in that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path and its content. Re-inserting an existing key replaces
    /// the content in place and keeps the original position.
    pub fn insert(&mut self, path: String, content: String) {
        if let Some(&pos) = self.index.get(&path) {
            self.entries[pos].1 = content;
            return;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push((path, content));
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.index.get(path).map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relative paths in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(path, content)| (path.as_str(), content.as_str()))
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, content) in &self.entries {
            map.serialize_entry(path, content)?;
        }
        map.end()
    }
}

/// Literal entry names that are pruned from the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeSet {
    names: BTreeSet<String>,
}

impl ExcludeSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn empty() -> Self {
        Self { names: BTreeSet::new() }
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    /// True when `name` equals an excluded name or has one as its leading
    /// path segment (`name` == `ex` or `name` starts with `ex/`).
    pub fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|ex| {
            name == ex
                || name.strip_prefix(ex.as_str()).is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self::new(default_exclude_names().iter().copied())
    }
}

/// Regular expression matched against file base names.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    regex: Regex,
}

impl FilterPattern {
    pub fn new(pattern: &str) -> Result<Self, ScanError> {
        let regex = Regex::new(pattern).map_err(|source| ScanError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Unanchored search, so `ts` matches `a.ts` and `tsconfig.json` alike.
    pub fn is_match(&self, base_name: &str) -> bool {
        self.regex.is_match(base_name)
    }
}

impl fmt::Display for FilterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

/// How file bytes are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Invalid UTF-8 is a per-file read failure.
    #[default]
    Strict,
    /// Fall back to encoding detection and decode with replacement.
    Lossy,
}

/// What went wrong for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A file could not be read or decoded.
    FileRead,
    /// A directory below the root could not be listed.
    DirectoryRead,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::FileRead => f.write_str("file"),
            FailureKind::DirectoryRead => f.write_str("directory"),
        }
    }
}

/// An entry that was skipped because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub reason: String,
}

/// Result of attempting to read one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Read(String),
    Failed(String),
}

/// Everything a scan produced: the collected files and the entries it had to
/// skip.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub files: ScanResult,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn file_failures(&self) -> impl Iterator<Item = &ScanFailure> {
        self.failures.iter().filter(|f| f.kind == FailureKind::FileRead)
    }
}

/// Settings loaded from a project config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Replaces the default exclude names when present.
    #[serde(deserialize_with = "deserialize_optional_names")]
    pub exclude: Option<Vec<String>>,
    /// Added on top of `exclude` (or the defaults).
    #[serde(deserialize_with = "deserialize_names")]
    pub exclude_add: Vec<String>,
    pub decode: DecodeMode,
}

impl Config {
    pub fn exclude_set(&self) -> ExcludeSet {
        let mut set = match &self.exclude {
            Some(names) => ExcludeSet::new(names.iter().cloned()),
            None => ExcludeSet::default(),
        };
        set.extend(self.exclude_add.iter().cloned());
        set
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    Csv(String),
    List(Vec<String>),
}

impl NameList {
    fn normalize(self) -> Vec<String> {
        let raw = match self {
            NameList::Csv(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
            NameList::List(items) => items,
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn deserialize_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(NameList::deserialize(deserializer)?.normalize())
}

fn deserialize_optional_names<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(Some(NameList::deserialize(deserializer)?.normalize()))
}

//! Depth-first scanner that collects file contents keyed by relative path

use crate::domain::{
    DecodeMode, ExcludeSet, FailureKind, FileOutcome, FilterPattern, ScanFailure, ScanReport,
};
use crate::error::ScanError;
use crate::utils::{read_text, relative_key};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File scanner that walks a tree, prunes excluded names and reads the
/// remaining files as text.
pub struct Scanner {
    root_path: PathBuf,
    filter: Option<FilterPattern>,
    excludes: ExcludeSet,
    decode: DecodeMode,
}

impl Scanner {
    /// Create a new Scanner with the default exclude names, no filter and
    /// strict UTF-8 decoding.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            filter: None,
            excludes: ExcludeSet::default(),
            decode: DecodeMode::Strict,
        }
    }

    /// Only read files whose base name matches `filter`
    pub fn filter(mut self, filter: Option<FilterPattern>) -> Self {
        self.filter = filter;
        self
    }

    /// Set the names pruned from the walk
    pub fn excludes(mut self, excludes: ExcludeSet) -> Self {
        self.excludes = excludes;
        self
    }

    /// Set how file bytes are decoded
    pub fn decode(mut self, decode: DecodeMode) -> Self {
        self.decode = decode;
        self
    }

    /// Walk the tree and return every readable file plus the entries that had
    /// to be skipped.
    ///
    /// Entries come back in traversal order: depth-first, siblings in the
    /// order the directory listing yields them. Only a missing or unreadable
    /// root is an error; anything below it is recorded in
    /// [`ScanReport::failures`] and the walk carries on.
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        let root = self.root_path.as_path();
        let metadata = fs::metadata(root)
            .map_err(|source| ScanError::Root { path: root.to_path_buf(), source })?;
        if !metadata.is_dir() {
            return Err(ScanError::Root {
                path: root.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            });
        }

        let mut report = ScanReport::default();

        // The root itself is never pruned, whatever its name.
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry));

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    self.record_walk_error(err, &mut report)?;
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                tracing::debug!("Directory: {}", entry.path().display());
                continue;
            }

            if file_type.is_symlink() {
                // Links are read through to files but never descended into.
                if fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()) {
                    tracing::debug!("Skipping directory symlink {}", entry.path().display());
                    continue;
                }
            } else if !file_type.is_file() {
                tracing::debug!("Skipping special file {}", entry.path().display());
                continue;
            }

            self.visit_file(&entry, &mut report);
        }

        tracing::debug!(
            "Scan of {} finished: {} files, {} failures",
            root.display(),
            report.files.len(),
            report.failures.len()
        );

        Ok(report)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        let excluded = self.excludes.matches(&name);
        if excluded {
            tracing::debug!("Excluding {}", entry.path().display());
        }
        excluded
    }

    fn visit_file(&self, entry: &DirEntry, report: &mut ScanReport) {
        let path = entry.path();

        if let Some(filter) = &self.filter {
            if !filter.is_match(&entry.file_name().to_string_lossy()) {
                return;
            }
        }

        let Some(key) = relative_key(&self.root_path, path) else {
            record_failure(report, path, FailureKind::FileRead, "path is not valid UTF-8");
            return;
        };

        match self.read_file(path) {
            FileOutcome::Read(content) => report.files.insert(key, content),
            FileOutcome::Failed(reason) => {
                record_failure(report, path, FailureKind::FileRead, reason);
            }
        }
    }

    fn read_file(&self, path: &Path) -> FileOutcome {
        match read_text(path, self.decode) {
            Ok(content) => FileOutcome::Read(content),
            Err(err) => FileOutcome::Failed(format!("{err:#}")),
        }
    }

    /// A listing failure below the root is skipped; at the root it aborts.
    fn record_walk_error(
        &self,
        err: walkdir::Error,
        report: &mut ScanReport,
    ) -> Result<(), ScanError> {
        let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| self.root_path.clone());
        if path == self.root_path {
            return Err(ScanError::Root { path, source: err.into() });
        }

        let kind = if fs::symlink_metadata(&path).is_ok_and(|m| m.is_dir()) {
            FailureKind::DirectoryRead
        } else {
            FailureKind::FileRead
        };
        record_failure(report, &path, kind, err.to_string());
        Ok(())
    }
}

fn record_failure(
    report: &mut ScanReport,
    path: &Path,
    kind: FailureKind,
    reason: impl Into<String>,
) {
    let reason = reason.into();
    tracing::warn!("Error reading {} {}: {}", kind, path.display(), reason);
    report.failures.push(ScanFailure { path: path.to_path_buf(), kind, reason });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(parts: &[&str]) -> String {
        parts.iter().collect::<PathBuf>().to_string_lossy().into_owned()
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scanner_basic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "main.rs", "fn main() {}");
        write(root, "src/lib.rs", "pub fn lib() {}");
        write(root, "src/nested/deep.txt", "deep");

        let report = Scanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(report.files.len(), 3);
        assert!(report.failures.is_empty());
        assert_eq!(report.files.get("main.rs"), Some("fn main() {}"));
        assert_eq!(report.files.get(&key(&["src", "lib.rs"])), Some("pub fn lib() {}"));
        assert_eq!(report.files.get(&key(&["src", "nested", "deep.txt"])), Some("deep"));
    }

    #[test]
    fn test_empty_tree_yields_empty_result() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("empty/also_empty")).unwrap();

        let report = Scanner::new(temp_dir.path().to_path_buf()).scan().unwrap();
        assert!(report.files.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_noise_dirs_skipped_at_any_depth() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, ".git/config", "[core]");
        write(root, "node_modules/react/index.ts", "export {}");
        write(root, "packages/app/node_modules/lib/index.ts", "export {}");
        write(root, "packages/app/src/index.ts", "export const app = 1;");
        write(root, "dist/bundle.ts", "bundled");

        let filter = FilterPattern::new(r"\.ts$").unwrap();
        let report = scan_with(root, Some(filter), ExcludeSet::default());

        let keys: Vec<&str> = report.files.keys().collect();
        assert_eq!(keys, vec![key(&["packages", "app", "src", "index.ts"])]);
    }

    #[test]
    fn test_excluded_file_names_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "keep.txt", "keep");
        write(root, "secret.env", "TOKEN=1");
        write(root, "sub/secret.env", "TOKEN=2");

        let report = scan_with(root, None, ExcludeSet::new(["secret.env"]));
        let keys: Vec<&str> = report.files.keys().collect();
        assert_eq!(keys, vec!["keep.txt"]);
    }

    #[test]
    fn test_root_named_like_excluded_dir_is_still_scanned() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("build");
        write(&root, "a.txt", "a");

        let report = scan_with(&root, None, ExcludeSet::default());
        assert_eq!(report.files.len(), 1);
        assert!(report.files.contains("a.txt"));
    }

    #[test]
    fn test_filter_matches_base_name_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "a.ts", "a");
        write(root, "b.js", "b");
        write(root, "c.ts", "c");
        write(root, "types.ts.d/readme.md", "not a ts file");

        let filter = FilterPattern::new(r"\.ts$").unwrap();
        let report = crate::scan::scan(root, Some(&filter), &ExcludeSet::empty()).unwrap();

        let mut keys: Vec<&str> = report.files.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["a.ts", "c.ts"]);
    }

    #[test]
    fn test_filter_does_not_prune_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "src/components/button.tsx", "button");

        let filter = FilterPattern::new("button").unwrap();
        let report = scan_with(root, Some(filter), ExcludeSet::empty());
        assert!(report.files.contains(&key(&["src", "components", "button.tsx"])));
    }

    #[test]
    fn test_unreadable_file_does_not_abort_scan() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "one.txt", "1");
        write(root, "two.txt", "2");
        write(root, "dir/three.txt", "3");
        write(root, "dir/four.txt", "4");
        fs::write(root.join("dir/broken.txt"), [0xff, 0xfe, 0xfd, 0x00, 0xc3]).unwrap();

        let report = Scanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(report.files.len(), 4);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.kind, FailureKind::FileRead);
        assert!(failure.path.ends_with("dir/broken.txt"));
        assert!(failure.reason.contains("UTF-8"), "reason: {}", failure.reason);
    }

    #[test]
    fn test_lossy_mode_reads_non_utf8_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("latin1.txt"), [b'c', b'a', b'f', 0xe9]).unwrap();

        let report = Scanner::new(root.to_path_buf()).decode(DecodeMode::Lossy).scan().unwrap();
        assert!(report.failures.is_empty());
        assert!(report.files.get("latin1.txt").unwrap().starts_with("caf"));
    }

    #[test]
    fn test_repeated_scans_are_identical() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "a.md", "# A");
        write(root, "x/y/z.rs", "fn z() {}");
        write(root, "x/w.rs", "fn w() {}");

        let scanner = Scanner::new(root.to_path_buf());
        let first = scanner.scan().unwrap();
        let second = scanner.scan().unwrap();

        assert_eq!(first.files.len(), second.files.len());
        for (path, content) in first.files.iter() {
            assert_eq!(second.files.get(path), Some(content));
        }
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let err = Scanner::new(missing).scan().unwrap_err();
        assert!(matches!(err, ScanError::Root { .. }));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = Scanner::new(file).scan().unwrap_err();
        assert!(matches!(err, ScanError::Root { .. }));
        let cause = std::error::Error::source(&err).expect("io cause");
        assert_eq!(cause.to_string(), "not a directory");
        assert!(!err.to_string().contains("not a directory"));
    }

    #[cfg(unix)]
    fn set_mode(path: &Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "b.txt", "b");
        write(root, "ok/a.txt", "a");
        write(root, "locked/hidden.txt", "hidden");
        let locked = root.join("locked");
        set_mode(&locked, 0o000);

        // Privileged users can list the directory anyway.
        if fs::read_dir(&locked).is_ok() {
            set_mode(&locked, 0o755);
            return;
        }

        let report = Scanner::new(root.to_path_buf()).scan();
        set_mode(&locked, 0o755);
        let report = report.unwrap();

        let mut keys: Vec<&str> = report.files.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["b.txt".to_string(), key(&["ok", "a.txt"])]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::DirectoryRead);
        assert_eq!(report.failures[0].path, locked);
        assert_eq!(report.file_failures().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        write(&root, "a.txt", "a");
        set_mode(&root, 0o333);

        if fs::read_dir(&root).is_ok() {
            set_mode(&root, 0o755);
            return;
        }

        let result = Scanner::new(root.clone()).scan();
        set_mode(&root, 0o755);

        match result {
            Err(ScanError::Root { path, source }) => {
                assert_eq!(path, root);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected a root error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "real.txt", "real");
        std::os::unix::fs::symlink(root.join("gone.txt"), root.join("dangling.txt")).unwrap();

        let report = Scanner::new(root.to_path_buf()).scan().unwrap();
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.file_failures().count(), 1);
        assert!(report.failures[0].path.ends_with("dangling.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_read_files_but_not_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "target/inner.txt", "inner");
        write(root, "real.txt", "real");
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("alias.txt")).unwrap();
        std::os::unix::fs::symlink(root.join("target"), root.join("linked_dir")).unwrap();

        let report = Scanner::new(root.to_path_buf()).scan().unwrap();
        assert_eq!(report.files.get("alias.txt"), Some("real"));
        assert!(!report.files.contains(&key(&["linked_dir", "inner.txt"])));
        assert!(report.files.contains(&key(&["target", "inner.txt"])));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_name_is_reported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "ok.txt", "ok");
        fs::write(root.join(OsStr::from_bytes(b"bad\xffname.txt")), "x").unwrap();

        let report = Scanner::new(root.to_path_buf()).scan().unwrap();
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("not valid UTF-8"));
    }

    fn scan_with(root: &Path, filter: Option<FilterPattern>, excludes: ExcludeSet) -> ScanReport {
        Scanner::new(root.to_path_buf()).filter(filter).excludes(excludes).scan().unwrap()
    }
}

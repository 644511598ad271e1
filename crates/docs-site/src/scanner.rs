//! Source file discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::error::BuildError;

/// A discovered markup file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Logical path relative to the source root, without `.md`.
    pub path: String,
    pub source_path: PathBuf,
    /// Modification time in nanoseconds since the Unix epoch, 0 if unknown.
    pub mtime_ns: u64,
}

/// Walks the source tree for `*.md` files.
pub(crate) struct Scanner<'a> {
    source_dir: &'a Path,
    /// Canonical form of the directory to skip, if it exists.
    skip_dir: Option<PathBuf>,
}

impl<'a> Scanner<'a> {
    /// `skip_dir` is never descended into (usually the output directory),
    /// whatever form its path is given in.
    pub fn new(source_dir: &'a Path, skip_dir: &Path) -> Self {
        Self {
            source_dir,
            skip_dir: fs::canonicalize(skip_dir).ok(),
        }
    }

    fn is_skipped(&self, dir: &Path) -> bool {
        self.skip_dir
            .as_deref()
            .is_some_and(|skip| fs::canonicalize(dir).is_ok_and(|dir| dir == skip))
    }

    /// Collect every markup file under `root`, sorted by logical path.
    ///
    /// Logical paths stay relative to the source directory even when `root`
    /// is a subdirectory. A missing `root` yields no files.
    pub fn scan(&self, root: &Path) -> Result<Vec<SourceFile>, BuildError> {
        let mut files = Vec::new();
        if root.is_dir() {
            self.scan_directory(root, &mut files)?;
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn scan_directory(&self, dir: &Path, files: &mut Vec<SourceFile>) -> Result<(), BuildError> {
        let entries = fs::read_dir(dir).map_err(|source| BuildError::SourceUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }

            let entry_path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if self.is_skipped(&entry_path) {
                    continue;
                }
                self.scan_directory(&entry_path, files)?;
            } else if name.ends_with(".md")
                && let Some(path) = self.logical_path(&entry_path)
            {
                let mtime_ns = modified_ns(&entry_path);
                files.push(SourceFile {
                    path,
                    source_path: entry_path,
                    mtime_ns,
                });
            }
        }
        Ok(())
    }

    fn logical_path(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(self.source_dir).ok()?.with_extension("");
        let segments: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        (!segments.is_empty()).then(|| segments.join("/"))
    }
}

fn modified_ns(path: &Path) -> u64 {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .and_then(|elapsed| u64::try_from(elapsed.as_nanos()).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn paths(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guide/setup")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("html/guide")).unwrap();
        fs::write(root.join("index.md"), "# Home").unwrap();
        fs::write(root.join("guide/index.md"), "# Guide").unwrap();
        fs::write(root.join("guide/setup/linux.md"), "# Linux").unwrap();
        fs::write(root.join("guide/notes.txt"), "ignored").unwrap();
        fs::write(root.join(".git/readme.md"), "hidden").unwrap();
        fs::write(root.join(".draft.md"), "hidden").unwrap();
        fs::write(root.join("html/guide/old.md"), "output").unwrap();
        dir
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let dir = tree();
        let output = dir.path().join("html");
        let scanner = Scanner::new(dir.path(), &output);

        let files = scanner.scan(dir.path()).unwrap();

        assert_eq!(paths(&files), vec!["guide/index", "guide/setup/linux", "index"]);
        assert_eq!(files[2].source_path, dir.path().join("index.md"));
        assert!(files[2].mtime_ns > 0);
    }

    #[test]
    fn test_scan_subdirectory_keeps_full_paths() {
        let dir = tree();
        let output = dir.path().join("html");
        let scanner = Scanner::new(dir.path(), &output);

        let files = scanner.scan(&dir.path().join("guide")).unwrap();

        assert_eq!(paths(&files), vec!["guide/index", "guide/setup/linux"]);
    }

    #[test]
    fn test_skip_dir_matches_any_spelling() {
        let dir = tree();
        let output = dir.path().join("guide/../html");
        let scanner = Scanner::new(dir.path(), &output);

        let files = scanner.scan(dir.path()).unwrap();

        assert!(!paths(&files).contains(&"html/guide/old"));
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let dir = tree();
        let scanner = Scanner::new(dir.path(), dir.path());

        assert!(scanner.scan(&dir.path().join("nope")).unwrap().is_empty());
    }
}

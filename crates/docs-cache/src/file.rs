//! File-backed cache.
//!
//! Each entry is one file under `{root}/{bucket}/{key}` holding the raw value.
//!
//! Writes go to a sibling `*.tmp` file that is renamed into place, so a
//! reader sees either the previous entry or the new one, never a torn write.
//!
//! The root holds a `VERSION` file. When it is missing or names a different
//! tool version the whole root is wiped before use.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Cache, CacheBucket};

/// [`Cache`] rooted at a directory on disk.
///
/// ```text
/// {root}/
/// +-- VERSION
/// +-- meta/
///     +-- documents
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open the cache at `root`, wiping it if it was written by another version.
    ///
    /// Problems while validating are logged, never returned: an unusable
    /// cache directory simply produces misses.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    /// Root directory of this cache.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

struct FileCacheBucket {
    dir: PathBuf,
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.dir.join(key)).ok()
    }

    fn set(&self, key: &str, value: &[u8]) {
        let path = self.dir.join(key);
        let Some(parent) = path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::debug!(error = %e, dir = %parent.display(), "Failed to create cache bucket");
            return;
        }

        let tmp = path.with_extension("tmp");
        if let Err(e) = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            tracing::debug!(error = %e, key, "Failed to write cache entry");
            let _ = fs::remove_file(&tmp);
        }
    }
}

fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored.trim() == version => {
            tracing::debug!(version, "Cache version matches");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                stored = stored.trim(),
                current = version,
                "Cache version changed, wiping cache"
            );
        }
        Err(_) => {
            tracing::debug!(root = %root.display(), "No cache VERSION file, initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!(error = %e, "Failed to remove cache directory");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!(error = %e, "Failed to create cache directory");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!(error = %e, "Failed to write cache VERSION file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(tmp: &TempDir, version: &str) -> FileCache {
        FileCache::new(tmp.path().join("cache"), version)
    }

    #[test]
    fn test_set_and_get() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp, "1.0.0").bucket("meta");

        bucket.set("documents", br#"{"index":{}}"#);

        assert_eq!(bucket.get("documents"), Some(br#"{"index":{}}"#.to_vec()));
    }

    #[test]
    fn test_value_is_stored_verbatim() {
        let tmp = TempDir::new().unwrap();
        let cache = open(&tmp, "1.0.0");

        cache.bucket("meta").set("k", b"line one\nline two\n\0\xff");

        assert_eq!(
            fs::read(cache.root().join("meta/k")).unwrap(),
            b"line one\nline two\n\0\xff"
        );
    }

    #[test]
    fn test_missing_key_misses() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp, "1.0.0").bucket("meta");

        assert_eq!(bucket.get("nope"), None);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let cache = open(&tmp, "1.0.0");
        let bucket = cache.bucket("meta");

        bucket.set("documents", b"first");
        bucket.set("documents", b"second");

        assert_eq!(bucket.get("documents"), Some(b"second".to_vec()));
        assert!(!cache.root().join("meta/documents.tmp").exists());
    }

    #[test]
    fn test_same_version_keeps_entries() {
        let tmp = TempDir::new().unwrap();
        open(&tmp, "1.0.0").bucket("meta").set("documents", b"kept");

        let reopened = open(&tmp, "1.0.0");

        assert_eq!(reopened.bucket("meta").get("documents"), Some(b"kept".to_vec()));
    }

    #[test]
    fn test_version_change_wipes_entries() {
        let tmp = TempDir::new().unwrap();
        open(&tmp, "1.0.0").bucket("meta").set("documents", b"old");

        let reopened = open(&tmp, "1.1.0");

        assert_eq!(reopened.bucket("meta").get("documents"), None);
        assert_eq!(
            fs::read_to_string(reopened.root().join("VERSION")).unwrap(),
            "1.1.0"
        );
    }

    #[test]
    fn test_missing_version_file_wipes_entries() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");
        fs::create_dir_all(root.join("meta")).unwrap();
        fs::write(root.join("meta/documents"), b"stale").unwrap();

        let cache = FileCache::new(root.clone(), "1.0.0");

        assert_eq!(cache.bucket("meta").get("documents"), None);
        assert!(root.join("VERSION").exists());
    }
}

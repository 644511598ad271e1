//! Persistence of the metadata store between builds.
//!
//! The whole store is one JSON value in the `meta` bucket:
//!
//! ```json
//! {
//!     "documents": {
//!         "guide/install": {"path": "guide/install", "url": "guide/install.html", ...}
//!     }
//! }
//! ```
//!
//! Loading never fails. A missing, unreadable or malformed cache yields an
//! empty store and the build parses every file.

use std::collections::BTreeMap;
use std::path::Path;

use docs_cache::{Cache, CacheBucket, CacheBucketExt, FileCache, NullCache};
use serde::{Deserialize, Serialize};

use crate::{Document, MetaStore, MetaStoreBuilder};

const BUCKET: &str = "meta";
const KEY: &str = "documents";

#[derive(Serialize, Deserialize)]
struct CachedStore {
    documents: BTreeMap<String, Document>,
}

#[derive(Serialize)]
struct CachedStoreRef<'a> {
    documents: BTreeMap<&'a str, &'a Document>,
}

/// Loader and writer for the persisted [`MetaStore`].
pub struct MetaCache {
    bucket: Box<dyn CacheBucket>,
}

impl MetaCache {
    /// Use the `meta` bucket of an arbitrary cache.
    pub fn new(cache: &dyn Cache) -> Self {
        Self {
            bucket: cache.bucket(BUCKET),
        }
    }

    /// File-backed cache at `cache_dir`, wiped if written by another `version`.
    pub fn open(cache_dir: &Path, version: &str) -> Self {
        Self::new(&FileCache::new(cache_dir.to_path_buf(), version))
    }

    /// Cache that never loads or stores anything.
    pub fn disabled() -> Self {
        Self::new(&NullCache)
    }

    /// Restore the store written by a previous build.
    ///
    /// Entries whose key does not match their own path are dropped.
    pub fn load(&self) -> MetaStore {
        let mut builder = MetaStoreBuilder::new();

        let Some(cached) = self.bucket.get_json::<CachedStore>(KEY) else {
            tracing::debug!("No usable metadata cache, starting empty");
            return builder.freeze();
        };

        for (key, document) in cached.documents {
            if key != document.path {
                tracing::debug!(
                    key = %key,
                    path = %document.path,
                    "Skipping mismatched cache entry"
                );
                continue;
            }
            builder.register(document);
        }

        tracing::debug!(documents = builder.len(), "Loaded metadata cache");
        builder.freeze()
    }

    /// Persist `store` for the next build. Failures are logged, not returned.
    pub fn save(&self, store: &MetaStore) {
        let cached = CachedStoreRef {
            documents: store.all().map(|doc| (doc.path.as_str(), doc)).collect(),
        };
        self.bucket.set_json(KEY, &cached);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use docs_cache::MemoryCache;
    use docs_markup::{MarkupParser, TitleEntry};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn sample_store() -> MetaStore {
        let page = MarkupParser::new()
            .parse("# Home\n\n:::toc{maxdepth=1}\nguide/install\n:::\n")
            .unwrap();
        let mut builder = MetaStoreBuilder::new();
        builder.register(Document::from_parsed("index", "index.md".into(), 11, page));
        builder.register(Document::new(
            "guide/install",
            vec![TitleEntry::new("Install", vec![TitleEntry::leaf("Linux")])],
        ));
        builder.freeze()
    }

    #[test]
    fn test_saved_store_loads_back() {
        let cache = MemoryCache::default();
        let store = sample_store();

        MetaCache::new(&cache).save(&store);
        let loaded = MetaCache::new(&cache).load();

        assert_eq!(loaded.len(), 2);
        for doc in store.all() {
            assert_eq!(loaded.lookup(&doc.path), Some(doc));
        }
    }

    #[test]
    fn test_absent_cache_is_empty() {
        let cache = MemoryCache::default();
        assert!(MetaCache::new(&cache).load().is_empty());
    }

    #[test]
    fn test_corrupt_cache_is_empty() {
        let cache = MemoryCache::default();
        cache.bucket(BUCKET).set(KEY, b"{\"documents\": [truncated");

        assert!(MetaCache::new(&cache).load().is_empty());
    }

    #[test]
    fn test_wrong_shape_is_empty() {
        let cache = MemoryCache::default();
        cache
            .bucket(BUCKET)
            .set(KEY, br#"{"documents": {"index": {"path": 1}}}"#);

        assert!(MetaCache::new(&cache).load().is_empty());
    }

    #[test]
    fn test_mismatched_key_is_dropped() {
        let cache = MemoryCache::default();
        let doc = Document::new("real", vec![TitleEntry::leaf("Real")]);
        let mut documents = BTreeMap::new();
        documents.insert("other".to_owned(), doc.clone());
        documents.insert("real".to_owned(), doc);
        cache.bucket(BUCKET).set_json(KEY, &CachedStore { documents });

        let loaded = MetaCache::new(&cache).load();

        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains("real"));
    }

    #[test]
    fn test_disabled_cache_never_loads() {
        let cache = MetaCache::disabled();
        cache.save(&sample_store());
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_file_cache_round_trip_and_corruption() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".cache");

        MetaCache::open(&dir, "0.1.0").save(&sample_store());
        assert_eq!(MetaCache::open(&dir, "0.1.0").load().len(), 2);

        fs::write(dir.join("meta/documents"), b"\n\x00\x01garbage").unwrap();
        assert!(MetaCache::open(&dir, "0.1.0").load().is_empty());
    }

    #[test]
    fn test_file_cache_from_other_version_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".cache");

        MetaCache::open(&dir, "0.1.0").save(&sample_store());

        assert!(MetaCache::open(&dir, "0.2.0").load().is_empty());
    }
}

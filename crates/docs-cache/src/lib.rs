//! Versioned key-value cache for the documentation builder.
//!
//! Consumers talk to two traits and never to the storage behind them:
//!
//! - [`Cache`]: opens named buckets
//! - [`CacheBucket`]: byte values keyed by name
//!
//! # Backends
//!
//! - [`FileCache`]: one file per entry under a versioned root directory
//! - [`MemoryCache`]: process-local map, handy for tests
//! - [`NullCache`]: never stores anything (used for `--disable-cache`)
//!
//! # Example
//!
//! ```
//! use docs_cache::{Cache, CacheBucketExt, MemoryCache};
//!
//! let cache = MemoryCache::default();
//! let bucket = cache.bucket("meta");
//! bucket.set_json("documents", &vec!["index", "guide/install"]);
//! let paths: Option<Vec<String>> = bucket.get_json("documents");
//! assert_eq!(paths.unwrap().len(), 2);
//! ```

mod ext;
mod file;
mod memory;

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// A named partition within a [`Cache`].
///
/// Values are opaque bytes. Staleness across tool versions is handled by the
/// backend (see [`FileCache`]); callers validate their own records.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value. `None` on a miss.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value, replacing any previous entry for `key`.
    ///
    /// Failures are swallowed: a cache that cannot be written behaves like a
    /// cache that is empty on the next run.
    fn set(&self, key: &str, value: &[u8]);
}

/// Factory for named [`CacheBucket`]s.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// # Arguments
    ///
    /// * `name` - Bucket name (e.g., "meta")
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// [`CacheBucket`] that never stores or retrieves data.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8]) {}
}

/// [`Cache`] used when caching is disabled. Every lookup misses.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_never_hits() {
        let bucket = NullCache.bucket("meta");

        assert_eq!(bucket.get("documents"), None);

        bucket.set("documents", b"{}");
        assert_eq!(bucket.get("documents"), None);
    }
}

//! Typed access on top of raw [`CacheBucket`] bytes.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// JSON convenience methods for any [`CacheBucket`].
///
/// Kept on an extension trait so [`CacheBucket`] stays object-safe and
/// backends only deal with bytes.
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve and deserialize a JSON value.
    ///
    /// A stored value that no longer deserializes (for example after the
    /// record shape changed) is reported as a miss.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Discarding malformed cache entry");
                None
            }
        }
    }

    /// Serialize `value` as JSON and store it.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.set(key, &bytes),
            Err(e) => tracing::debug!(key, error = %e, "Failed to serialize cache entry"),
        }
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{Cache, MemoryCache};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        url: String,
        mtime: u64,
    }

    #[test]
    fn test_json_value_is_read_back() {
        let cache = MemoryCache::default();
        let bucket = cache.bucket("meta");
        let entry = Entry {
            url: "guide/install.html".to_owned(),
            mtime: 42,
        };

        bucket.set_json("guide/install", &entry);

        assert_eq!(bucket.get_json::<Entry>("guide/install"), Some(entry));
    }

    #[test]
    fn test_malformed_json_is_a_miss() {
        let cache = MemoryCache::default();
        let bucket = cache.bucket("meta");
        bucket.set("documents", b"{not json");

        assert_eq!(bucket.get_json::<Entry>("documents"), None);
    }

    #[test]
    fn test_wrong_shape_is_a_miss() {
        let cache = MemoryCache::default();
        let bucket = cache.bucket("meta");
        bucket.set("documents", br#"{"url": 3}"#);

        assert_eq!(bucket.get_json::<Entry>("documents"), None);
    }
}

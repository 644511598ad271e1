//! In-process cache backend.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{Cache, CacheBucket};

type Entries = Arc<RwLock<HashMap<(String, String), Vec<u8>>>>;

/// [`Cache`] that keeps entries in memory for the lifetime of the value.
///
/// Buckets opened from the same `MemoryCache` share storage, so a bucket
/// written through one handle is visible through another.
#[derive(Default)]
pub struct MemoryCache {
    entries: Entries,
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            entries: Arc::clone(&self.entries),
        })
    }
}

struct MemoryCacheBucket {
    name: String,
    entries: Entries,
}

impl MemoryCacheBucket {
    fn slot(&self, key: &str) -> (String, String) {
        (self.name.clone(), key.to_owned())
    }
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&self.slot(key)).cloned()
    }

    fn set(&self, key: &str, value: &[u8]) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(self.slot(key), value.to_vec());
    }
}

//! Seen block cache for deduplication.

use lru::LruCache;
use parking_lot::Mutex;
use shared_types::Hash;
use std::num::NonZeroUsize;

/// LRU record of recently seen block hashes.
///
/// Every access takes the same mutex, so the duplicate check and the insert
/// in [`SeenBlockCache::try_mark_seen`] form one critical section: of many
/// concurrent callers with the same unseen hash, exactly one gets `false`.
pub struct SeenBlockCache {
    cache: Mutex<LruCache<Hash, ()>>,
}

impl SeenBlockCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Mark `hash` as seen unless it already is.
    ///
    /// Returns `true` if the hash was already present (the caller holds a
    /// duplicate), `false` if this call inserted it. A hit refreshes the
    /// entry's recency.
    pub fn try_mark_seen(&self, hash: Hash) -> bool {
        let mut cache = self.cache.lock();
        if cache.get(&hash).is_some() {
            return true;
        }
        cache.put(hash, ());
        false
    }

    /// Mark `hash` as seen, whether or not it was present.
    pub fn mark_seen(&self, hash: Hash) {
        self.cache.lock().put(hash, ());
    }

    /// Check presence without touching recency.
    pub fn contains(&self, hash: &Hash) -> bool {
        self.cache.lock().contains(hash)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.cache.lock().cap()
    }
}

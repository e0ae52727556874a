//! Outcome cache keyed by derived name.
//!
//! Pipeline results are deterministic for a derived name, so failures are
//! cached as well: a request that failed once falls back straight away until
//! the cache is cleared.

use lru::LruCache;
use monoset_types::Stage;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Generated and compiled; resolve from the registry
    Ready,
    /// The pipeline stopped at `stage` with error `code`
    Failed {
        stage: Stage,
        code: &'static str,
        message: String,
    },
}

pub struct SpecializationCache {
    entries: LruCache<String, CacheEntry>,
}

impl SpecializationCache {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up `class_name`, marking it recently used.
    pub fn get(&mut self, class_name: &str) -> Option<CacheEntry> {
        self.entries.get(class_name).cloned()
    }

    pub fn peek(&self, class_name: &str) -> Option<&CacheEntry> {
        self.entries.peek(class_name)
    }

    pub fn insert(&mut self, class_name: impl Into<String>, entry: CacheEntry) {
        self.entries.put(class_name.into(), entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_least_recently_used_is_evicted() {
        let mut cache = SpecializationCache::new(2);
        cache.insert("ArrayListInteger", CacheEntry::Ready);
        cache.insert("ArrayListLong", CacheEntry::Ready);
        cache.get("ArrayListInteger");
        cache.insert("ArrayListShort", CacheEntry::Ready);

        assert!(cache.peek("ArrayListInteger").is_some());
        assert!(cache.peek("ArrayListLong").is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_cached() {
        let mut cache = SpecializationCache::new(4);
        cache.insert(
            "HashMapStringInteger",
            CacheEntry::Failed {
                stage: Stage::Compile,
                code: "M004",
                message: "exit code 1".to_string(),
            },
        );
        assert!(matches!(
            cache.get("HashMapStringInteger"),
            Some(CacheEntry::Failed { stage: Stage::Compile, .. })
        ));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(SpecializationCache::new(0).capacity(), 1);
    }
}

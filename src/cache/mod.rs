//! Expiring key-value cache for find results.
//!
//! # Responsibilities
//! - get/set with a per-entry TTL, keyed by an opaque string
//! - Unconditional operations only, no read-modify-write
//! - Safe to share across concurrently resolving requests
//!
//! # Design Decisions
//! - Lazy eviction: expired entries are dropped on the read that finds them
//! - Clones share the same underlying map, so one cache can back every
//!   request in the process

use std::hash::Hasher;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use fnv::FnvHasher;

use crate::remote::node::PathNode;

/// Cache used by lookups, shared process-wide by cloning.
pub type FindCache = TtlCache<Vec<PathNode>>;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    deadline: Instant,
}

/// A thread-safe cache whose entries expire after a per-entry TTL.
#[derive(Debug, Clone)]
pub struct TtlCache<V: Clone> {
    inner: Arc<DashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Look up a live entry. An expired entry counts as a miss and is
    /// removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let live = self.inner.get(key).and_then(|entry| {
            if entry.deadline > Instant::now() {
                Some(entry.value.clone())
            } else {
                None
            }
        });
        if live.is_none() {
            self.inner
                .remove_if(key, |_, entry| entry.deadline <= Instant::now());
        }
        live
    }

    /// Insert or replace an entry that expires `ttl` from now.
    pub fn set(&self, key: String, value: V, ttl: Duration) {
        self.inner.insert(
            key,
            Entry {
                value,
                deadline: Instant::now() + ttl,
            },
        );
    }

    /// Number of entries currently stored, expired or not.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic, compact cache key for a find call against one backend.
pub fn find_cache_key(host: &str, query: &str) -> String {
    let mut hasher = FnvHasher::default();
    hasher.write(b"find:");
    hasher.write(host.as_bytes());
    hasher.write(b":");
    hasher.write(query.as_bytes());
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_roundtrip() {
        let cache: TtlCache<u32> = TtlCache::new();
        assert!(cache.get("k").is_none());

        cache.set("k".into(), 7, Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entries_expire() {
        let cache: TtlCache<u32> = TtlCache::new();
        cache.set("k".into(), 7, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(25));

        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_overwrites_and_refreshes() {
        let cache: TtlCache<u32> = TtlCache::new();
        cache.set("k".into(), 1, Duration::from_millis(10));
        cache.set("k".into(), 2, Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(25));

        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_cache_key_is_deterministic_and_distinct() {
        let a = find_cache_key("a.example.com", "stats.*");
        assert_eq!(a, find_cache_key("a.example.com", "stats.*"));
        assert_ne!(a, find_cache_key("b.example.com", "stats.*"));
        assert_ne!(a, find_cache_key("a.example.com", "stats.cpu"));
        assert_eq!(a.len(), 16);
    }
}

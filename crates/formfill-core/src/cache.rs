//! Short-TTL render cache
//!
//! Keyed by the submission's content fingerprint. The TTL is tuned for
//! "don't re-render on rapid successive preview requests", not for
//! durable storage: entries are safe to lose at any moment and duplicate
//! regeneration after a racing miss is an accepted inefficiency.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Injected cache seam; tests substitute deterministic fakes.
pub trait RenderCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, bytes: Vec<u8>, ttl: Duration);
}

struct Entry {
    bytes: Vec<u8>,
    expires_at: Instant,
}

/// In-memory TTL cache with lazy eviction.
#[derive(Default)]
pub struct TtlCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RenderCache for TtlCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.bytes.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    fn set(&self, key: &str, bytes: Vec<u8>, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                bytes,
                expires_at: now + ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_returns_what_was_set() {
        let cache = TtlCache::new();
        cache.set("k", vec![1, 2, 3], Duration::from_secs(10));
        assert_eq!(cache.get("k"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_keys_return_none() {
        let cache = TtlCache::new();
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = TtlCache::new();
        cache.set("k", vec![1], Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let cache = TtlCache::new();
        cache.set("k", vec![1], Duration::from_secs(10));
        cache.set("k", vec![2], Duration::from_secs(10));
        assert_eq!(cache.get("k"), Some(vec![2]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stale_entries_are_swept_on_set() {
        let cache = TtlCache::new();
        cache.set("old", vec![1], Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(15));
        cache.set("new", vec![2], Duration::from_secs(10));
        assert_eq!(cache.len(), 1);
    }
}

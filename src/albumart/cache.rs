use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
    time::{Duration, Instant},
};

pub const CACHE_CAPACITY: usize = 10;
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    frame: String,
    inserted_at: Instant,
}

/// Rendered frames keyed by artwork URL.
///
/// Entries expire `ttl` after insertion. When full, inserting a new URL
/// evicts the entry with the oldest insertion time. Expired entries are not
/// removed on lookup; they age out through eviction or get overwritten.
pub struct RenderCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(CACHE_CAPACITY, CACHE_TTL)
    }
}

impl RenderCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn get(&self, url: &str) -> Option<String> {
        self.get_at(url, Instant::now())
    }

    pub fn insert(&self, url: &str, frame: String) {
        self.insert_at(url, frame, Instant::now());
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = HashMap::new();
    }

    fn get_at(&self, url: &str, now: Instant) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(url)
            .filter(|entry| now.saturating_duration_since(entry.inserted_at) < self.ttl)
            .map(|entry| entry.frame.clone())
    }

    fn insert_at(&self, url: &str, frame: String, now: Instant) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if !entries.contains_key(url) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                entries.remove(&key);
            }
        }

        entries.insert(
            url.to_string(),
            CacheEntry {
                frame,
                inserted_at: now,
            },
        );
    }
}

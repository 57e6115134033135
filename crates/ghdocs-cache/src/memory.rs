//! In-memory cache implementation.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::{CacheError, CacheStore};

/// A cached value and the instant it stops being visible.
#[derive(Debug)]
struct Entry {
    value: String,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Process-local [`CacheStore`] backed by a hash map.
///
/// Expired entries are treated as misses and pruned lazily, either on the
/// read that finds them or on the next write.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries whose TTL has not yet elapsed.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .map(|entries| entries.values().filter(|e| !e.is_expired(now)).count())
            .unwrap_or_default()
    }

    /// Whether the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it so the map does not grow with dead keys
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
            tracing::trace!(key, "evicted expired cache entry");
        }
        Ok(None)
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.retain(|_, e| !e.is_expired(now));
        entries.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: now.checked_add(ttl),
            },
        );
        Ok(())
    }
}

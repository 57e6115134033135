//! Cache stores for ghdocs.
//!
//! This crate provides the [`CacheStore`] trait that decouples page resolution
//! from the place cached pages live. Every entry is written with a
//! time-to-live and becomes invisible once it has elapsed.
//!
//! # Implementations
//!
//! - [`NullCache`]: No-op implementation (always misses)
//! - [`MemoryCache`]: Process-local map with lazy expiry
//! - [`FileCache`]: One file per key on disk, with version validation
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ghdocs_cache::{CacheStore, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! cache.put("docs.root.intro.master", "# Intro", Duration::from_secs(60)).unwrap();
//! assert_eq!(
//!     cache.get("docs.root.intro.master").unwrap().as_deref(),
//!     Some("# Intro")
//! );
//! ```

mod file;
mod memory;

use std::path::PathBuf;
use std::time::Duration;

pub use file::FileCache;
pub use memory::MemoryCache;

/// Error raised by a [`CacheStore`] backend.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    /// I/O failure while reading or writing an entry.
    #[error("cache I/O error at {}", path.display())]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("cache lock poisoned")]
    Poisoned,
}

/// Key/value store with per-entry time-to-live.
///
/// Keys are opaque strings chosen by the caller. Implementations must never
/// alias two distinct keys onto the same entry.
pub trait CacheStore: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `Ok(None)` when the key was never written or its TTL has
    /// elapsed.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key (e.g., `docs.root.installation.master`)
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value in the cache.
    ///
    /// Overwrites any existing entry for the same key.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key
    /// * `value` - Content to cache
    /// * `ttl` - How long the entry stays visible
    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// No-op [`CacheStore`] that never stores or retrieves data.
///
/// Use when caching is disabled. Every `get` misses and every `put` is
/// silently discarded.
#[derive(Debug, Default)]
pub struct NullCache;

impl CacheStore for NullCache {
    fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }
}

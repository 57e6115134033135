//! File-based cache implementation.
//!
//! [`FileCache`] stores each entry as a single file in the cache root. The
//! file name is the hex encoding of the key, so any key maps to a distinct,
//! filesystem-safe name. Each file holds a fixed header followed by the value:
//!
//! ```text
//! [expires_at_ms: u64 LE][value bytes]
//! ```
//!
//! `expires_at_ms` is milliseconds since the Unix epoch. On read, only the
//! header is read first; the value is read only when the entry is still live.
//!
//! Entries are written to a temporary file in the cache root and renamed over
//! the target, so a concurrent reader sees either the old or the new entry in
//! full, never a partial one.
//!
//! On construction, [`FileCache`] validates a `VERSION` file in the cache root.
//! If the version mismatches or is missing, the entire cache directory is wiped
//! and recreated, so entries written by an incompatible build are never read.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tempfile::NamedTempFile;

use crate::{CacheError, CacheStore};

/// Header length in bytes.
const HEADER_LEN: usize = 8;

/// File-based [`CacheStore`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION                      # contains the cache version string
/// +-- 646f63732e726f6f742e...      # hex("docs.root.intro.master")
/// +-- ...
/// ```
#[derive(Debug)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a new file-based cache at `root`, validating the cache version.
    ///
    /// If the `VERSION` file inside `root` does not match `version`, the entire
    /// cache directory is removed and recreated with the new version. Errors
    /// during validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    /// Root directory of this cache.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(hex::encode(key))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(key);
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let mut header = [0u8; HEADER_LEN];
        match file.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::debug!(key, "truncated cache entry, treating as miss");
                return Ok(None);
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        }

        if u64::from_le_bytes(header) <= now_millis() {
            drop(file);
            // Best effort: a stale file left behind only costs disk space
            let _ = fs::remove_file(&path);
            return Ok(None);
        }

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|source| CacheError::Io {
                path: path.clone(),
                source,
            })?;

        match String::from_utf8(data) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                tracing::debug!(key, "cache entry is not valid UTF-8, treating as miss");
                Ok(None)
            }
        }
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        fs::create_dir_all(&self.root).map_err(|source| CacheError::Io {
            path: self.root.clone(),
            source,
        })?;

        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let expires_at = now_millis().saturating_add(ttl_ms);

        let mut buf = Vec::with_capacity(HEADER_LEN + value.len());
        buf.extend_from_slice(&expires_at.to_le_bytes());
        buf.extend_from_slice(value.as_bytes());

        let path = self.entry_path(key);
        let io_err = |source: io::Error| CacheError::Io {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(io_err)?;
        tmp.write_all(&buf).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

/// Milliseconds since the Unix epoch.
fn now_millis() -> u64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Validate the cache version, wiping the directory on mismatch.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!("cache version matches: {version}");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                "cache version mismatch (stored={stored}, current={version}), wiping cache"
            );
        }
        Err(_) => {
            tracing::info!("no cache VERSION file found, initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to remove cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}

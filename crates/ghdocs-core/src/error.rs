//! Resolution error types.

use ghdocs_cache::CacheError;
use ghdocs_github::SourceError;

/// Error from [`DocResolver::page`](crate::DocResolver::page).
///
/// Only collaborator failures are errors. A missing branch, section, or page
/// is reported as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The repository tree source failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The cache store failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

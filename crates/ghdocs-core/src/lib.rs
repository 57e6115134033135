//! Documentation page resolution for ghdocs.
//!
//! Resolves a documentation page from a hosted repository by walking
//! branch → tree → (section tree) → blob, caching the resulting markdown.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ghdocs_cache::MemoryCache;
//! use ghdocs_core::{DocResolver, RepoRef};
//! use ghdocs_github::GithubClient;
//!
//! let resolver = DocResolver::new(
//!     Arc::new(GithubClient::new("https://api.github.com")),
//!     Arc::new(MemoryCache::new()),
//!     RepoRef::default(),
//! );
//!
//! match resolver.page("intro", Some("quickstart"), "develop")? {
//!     Some(markdown) => println!("{markdown}"),
//!     None => eprintln!("not found"),
//! }
//! ```

mod error;
mod key;
mod resolver;

pub use error::ResolveError;
pub use key::{CacheKey, NAMESPACE, PAGE_EXTENSION, ROOT_SECTION};
pub use resolver::{DEFAULT_BRANCH, DEFAULT_TTL, DocResolver, RepoRef, find_entry};

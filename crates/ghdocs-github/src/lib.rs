//! Repository tree source for ghdocs.
//!
//! This crate provides a [`RepoTreeSource`] trait for walking a hosted
//! repository snapshot: resolving branch names to commit SHAs, listing the
//! entries of a tree, and fetching raw blob content. This enables:
//!
//! - **Unit testing** without network access
//! - **Backend flexibility** (GitHub REST API, a local clone, a mirror)
//! - **Clean separation** between path resolution logic and transport
//!
//! # Architecture
//!
//! The crate provides:
//! - [`RepoTreeSource`] trait with `branches()`, `tree()`, and `blob()` methods
//! - [`GithubClient`] implementation over the GitHub REST API
//! - [`MockTreeSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use ghdocs_github::{GithubClient, RepoTreeSource};
//!
//! let client = GithubClient::new("https://api.github.com");
//! let branches = client.branches("laravel", "docs")?;
//! let tree = client.tree("laravel", "docs", &branches["master"])?;
//! for entry in tree {
//!     println!("{} ({:?})", entry.name, entry.kind);
//! }
//! ```

mod client;
mod error;
#[cfg(feature = "mock")]
mod mock;
mod source;

pub use client::GithubClient;
pub use error::SourceError;
#[cfg(feature = "mock")]
pub use mock::{MockCall, MockOperation, MockTreeSource};
pub use source::{EntryKind, RepoTreeSource, TreeEntry};
